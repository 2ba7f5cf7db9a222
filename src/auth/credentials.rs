//! Client credential pair used for token-endpoint authentication.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Per-user (or global, in single-tenant deployments) client id/secret pair.
///
/// Used only for the refresh and authorization-code exchanges. Immutable for the duration of
/// a request; the secret is redacted everywhere it could be formatted.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Confidential client secret.
	pub client_secret: TokenSecret,
}
impl ClientCredentials {
	/// Builds a credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: TokenSecret::new(client_secret) }
	}

	/// Returns the `Basic` authorization header value for the token endpoint.
	///
	/// The value is the base64 encoding of the literal colon-joined `client_id:client_secret`
	/// pair, as the authorization server requires.
	pub fn basic_authorization(&self) -> String {
		format!(
			"Basic {}",
			STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret.expose())),
		)
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn basic_authorization_encodes_colon_joined_pair() {
		let credentials = ClientCredentials::new("id", "secret");

		// base64("id:secret")
		assert_eq!(credentials.basic_authorization(), "Basic aWQ6c2VjcmV0");
	}

	#[test]
	fn debug_redacts_the_secret() {
		let rendered = format!("{:?}", ClientCredentials::new("id", "secret"));

		assert!(rendered.contains("client_id"));
		assert!(!rendered.contains("secret\""));
		assert!(rendered.contains("<redacted>"));
	}
}
