//! Name normalisation and fuzzy equivalence.
//!
//! Every function here is pure. Source systems spell guest names inconsistently
//! ("Mr. James Richardson", "james richardson", "J. Richardson"), so all
//! comparisons go through [`normalize`] first.

/// Honorifics stripped from the front of a name, in the order they are tried.
const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "dr", "prof"];

/// Default tolerance for [`names_equivalent`].
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Trim, lowercase, and strip leading honorifics.
///
/// Each honorific is recognised with a trailing period (`"dr."`, optionally
/// followed by a space) or with a trailing space (`"dr "`). Bare words such
/// as `"drew"` are left alone.
pub fn normalize(name: &str) -> String {
  let mut name = name.trim().to_lowercase();
  for honorific in HONORIFICS {
    let rest = name
      .strip_prefix(honorific)
      .and_then(|rest| rest.strip_prefix('.').or_else(|| rest.strip_prefix(' ')));
    if let Some(rest) = rest {
      name = rest.trim().to_owned();
    }
  }
  name
}

/// The last whitespace-delimited token of an already-normalised name.
pub fn last_token(normalized: &str) -> Option<&str> {
  normalized.split_whitespace().next_back()
}

/// The normalised last name of `name`, or `None` for a blank name.
pub fn last_name(name: &str) -> Option<String> {
  last_token(&normalize(name)).map(str::to_owned)
}

/// Edit distance over Unicode scalar values, re-exported for callers that
/// want the raw score rather than [`names_equivalent`]'s verdict.
pub use strsim::levenshtein;

/// Decide whether two raw names refer to the same guest.
///
/// True when the normalised names are identical, when their last tokens are
/// equal (`"P. Kapoor"` vs `"Priya Kapoor"`), or when the edit distance
/// between the full normalised names is at most `max_distance`.
pub fn names_equivalent(a: &str, b: &str, max_distance: usize) -> bool {
  let a = normalize(a);
  let b = normalize(b);
  if a == b {
    return true;
  }
  if let (Some(la), Some(lb)) = (last_token(&a), last_token(&b))
    && la == lb
  {
    return true;
  }
  levenshtein(&a, &b) <= max_distance
}
