// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distributor discovery: registry enumeration plus feature/visibility
//! filtering.

use crate::registry::Registry;

/// Enumerate installed distributors that satisfy `required_features`.
///
/// A candidate advertising feature metadata must carry *every* required
/// feature. A candidate without feature metadata is kept — the feature
/// filter fails open when introspection is unavailable, while visibility
/// filtering never does. An empty `required_features` means no filtering.
/// Order follows registry enumeration.
pub fn discover<R: Registry>(
    registry: &R,
    required_features: &[String],
) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    'candidates: for candidate in registry.find_candidates()? {
        for feature in required_features {
            match &candidate.features {
                Some(advertised) => {
                    if !advertised.iter().any(|f| f == feature) {
                        tracing::info!(
                            distributor = %candidate.identity,
                            feature = %feature,
                            "found distributor without required feature"
                        );
                        continue 'candidates;
                    }
                }
                None => {
                    tracing::warn!(
                        distributor = %candidate.identity,
                        "cannot filter distributor by features"
                    );
                }
            }
        }
        if candidate.exported || candidate.is_self {
            tracing::debug!(distributor = %candidate.identity, "found distributor");
            out.push(candidate.identity);
        }
    }
    Ok(out)
}
