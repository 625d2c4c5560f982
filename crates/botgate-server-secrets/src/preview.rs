// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Masked previews of provider keys for display.

use botgate_common_secret::SecretString;

/// Shown in place of keys too short to partially reveal.
pub const PREVIEW_MASK: &str = "***";

/// Characters revealed at each end of a long key.
const PREVIEW_EDGE: usize = 4;

/// Render `secret` as `first4...last4`, or [`PREVIEW_MASK`] when it has
/// 8 characters or fewer.
///
/// Counts Unicode scalar values, not bytes.
pub fn create_preview(secret: &SecretString) -> String {
	let value = secret.expose();
	let len = value.chars().count();
	if len <= PREVIEW_EDGE * 2 {
		return PREVIEW_MASK.to_string();
	}

	let head: String = value.chars().take(PREVIEW_EDGE).collect();
	let tail: String = value.chars().skip(len - PREVIEW_EDGE).collect();
	format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn preview(s: &str) -> String {
		create_preview(&SecretString::from(s))
	}

	#[test]
	fn long_key_shows_edges() {
		assert_eq!(preview("sk-proj-1234567890abcd"), "sk-p...abcd");
	}

	#[test]
	fn nine_chars_is_the_first_revealing_length() {
		assert_eq!(preview("123456789"), "1234...6789");
	}

	#[test]
	fn short_keys_are_fully_masked() {
		assert_eq!(preview(""), "***");
		assert_eq!(preview("abc"), "***");
		assert_eq!(preview("12345678"), "***");
	}

	#[test]
	fn multibyte_input_does_not_panic() {
		assert_eq!(preview("ключ-ключ-ключ"), "ключ...ключ");
		assert_eq!(preview("🔑🔑🔑"), "***");
	}

	proptest! {
		#[test]
		fn short_secrets_always_mask(s in "\\PC{0,8}") {
			prop_assert_eq!(preview(&s), PREVIEW_MASK);
		}

		#[test]
		fn long_secrets_reveal_only_edges(s in "\\PC{9,200}") {
			let chars: Vec<char> = s.chars().collect();
			let head: String = chars[..4].iter().collect();
			let tail: String = chars[chars.len() - 4..].iter().collect();
			prop_assert_eq!(preview(&s), format!("{head}...{tail}"));
		}

		#[test]
		fn preview_is_deterministic(s in "\\PC{0,64}") {
			prop_assert_eq!(preview(&s), preview(&s));
		}
	}
}
