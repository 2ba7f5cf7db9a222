//! Per-user configuration bundle and the resolver boundary that supplies it.

// self
use crate::{
	_prelude::*,
	auth::credentials::ClientCredentials,
	error::ConfigError,
	store::StorageLocator,
};

/// Read-only inputs for one request: who to authenticate as and where the tokens live.
///
/// The broker is parameterized entirely over this structure and holds no global
/// configuration state; the locator is caller-supplied and never cached across requests.
#[derive(Clone, Debug, PartialEq)]
pub struct UserConfig {
	/// Client credentials used for token-endpoint exchanges.
	pub credentials: ClientCredentials,
	/// Locator addressing the user's token document slot.
	pub locator: StorageLocator,
}

/// Future type returned by [`ConfigResolver`] implementations.
pub type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<UserConfig>> + 'a + Send>>;

/// External collaborator that supplies per-user configuration for the current caller.
///
/// The account store behind it (database, environment, secrets manager) is out of the
/// broker's scope; implementations only need to produce a [`UserConfig`] per user id.
pub trait ConfigResolver
where
	Self: Send + Sync,
{
	/// Resolves the configuration bundle for the provided user identifier.
	fn resolve<'a>(&'a self, user: &'a str) -> ResolveFuture<'a>;
}

/// Single-tenant resolver serving one fixed configuration regardless of user.
///
/// Mirrors environment-variable deployments where one set of client credentials and one
/// document locator serve the whole installation.
#[derive(Clone, Debug)]
pub struct StaticResolver {
	config: UserConfig,
	user: Option<String>,
}
impl StaticResolver {
	/// Builds a resolver that answers every lookup with `config`.
	pub fn new(config: UserConfig) -> Self {
		Self { config, user: None }
	}

	/// Restricts the resolver to a single accepted user identifier.
	pub fn for_user(mut self, user: impl Into<String>) -> Self {
		self.user = Some(user.into());

		self
	}
}
impl ConfigResolver for StaticResolver {
	fn resolve<'a>(&'a self, user: &'a str) -> ResolveFuture<'a> {
		Box::pin(async move {
			if let Some(expected) = &self.user
				&& expected != user
			{
				return Err(ConfigError::UnresolvedUser { user: user.to_owned() }.into());
			}

			Ok(self.config.clone())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> UserConfig {
		UserConfig {
			credentials: ClientCredentials::new("client", "secret"),
			locator: StorageLocator::new("doc", "credential", "slot.json"),
		}
	}

	#[tokio::test]
	async fn static_resolver_serves_any_user_by_default() {
		let resolver = StaticResolver::new(config());

		let resolved =
			resolver.resolve("anyone").await.expect("Unrestricted resolver should resolve.");

		assert_eq!(resolved, config());
	}

	#[tokio::test]
	async fn static_resolver_rejects_unknown_users_when_pinned() {
		let resolver = StaticResolver::new(config()).for_user("alice");

		assert!(resolver.resolve("alice").await.is_ok());

		let err = resolver
			.resolve("mallory")
			.await
			.expect_err("Pinned resolver should reject unknown users.");

		assert!(matches!(err, Error::Config(ConfigError::UnresolvedUser { .. })));
	}
}
