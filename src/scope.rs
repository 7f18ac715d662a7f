//! Scope parsing helpers for exchange requests.

// self
use crate::{_prelude::*, error::ConfigError};

/// Ordered list of candidate scope separators.
///
/// The handler splits a request's `scope` string on the first separator that
/// produces more than one segment, so earlier entries take priority over later
/// ones (e.g. favor commas, fall back to spaces). A string no separator splits
/// becomes a single-element scope list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeSeparators(Vec<String>);
impl ScopeSeparators {
	/// Creates a separator list after validating that it is non-empty and every
	/// entry is a non-empty string.
	pub fn new<I, S>(separators: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let entries = separators.into_iter().map(Into::into).collect::<Vec<_>>();

		if entries.is_empty() || entries.iter().any(String::is_empty) {
			return Err(ConfigError::EmptyScopeSeparator);
		}

		Ok(Self(entries))
	}

	/// Creates a single-separator list.
	pub fn single(separator: impl Into<String>) -> Result<Self, ConfigError> {
		Self::new([separator.into()])
	}

	/// Splits a raw scope string on the first separator that matches.
	pub fn split(&self, raw: &str) -> Vec<String> {
		for separator in &self.0 {
			let separated =
				raw.split(separator.as_str()).map(str::to_owned).collect::<Vec<_>>();

			if separated.len() > 1 {
				return separated;
			}
		}

		vec![raw.to_owned()]
	}

	/// Returns the configured separators in priority order.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Default for ScopeSeparators {
	fn default() -> Self {
		Self(vec![" ".into()])
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_separator_splits_on_spaces() {
		let separators = ScopeSeparators::default();

		assert_eq!(separators.split("read write"), vec!["read", "write"]);
		assert_eq!(separators.split("read"), vec!["read"]);
	}

	#[test]
	fn first_matching_separator_wins() {
		let separators = ScopeSeparators::new([",", " "])
			.expect("Separator list should be considered valid.");

		assert_eq!(separators.split("read,write"), vec!["read", "write"]);
		// The comma never matches here, so the fallback separator applies.
		assert_eq!(separators.split("alpha beta"), vec!["alpha", "beta"]);
		assert_eq!(separators.split("solo"), vec!["solo"]);
	}

	#[test]
	fn unmatched_scope_stays_whole() {
		let separators =
			ScopeSeparators::single(";").expect("Single separator should be accepted.");

		assert_eq!(separators.split("read write"), vec!["read write"]);
	}

	#[test]
	fn empty_separators_are_rejected() {
		assert!(matches!(
			ScopeSeparators::new([""]).expect_err("Empty separator strings must be rejected."),
			ConfigError::EmptyScopeSeparator,
		));
		assert!(ScopeSeparators::new(Vec::<String>::new()).is_err());
	}
}
