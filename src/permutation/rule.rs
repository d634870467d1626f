use itertools::Itertools;

use super::lanes::LaneBuffers;

/// Lane read by output stream `r` under rule `stage_index`: `(stage_index + r) mod R`.
///
/// `radix_mask` is `R - 1`, `R` being a power of two.
#[inline]
#[must_use]
pub const fn source_lane(stage_index: usize, r: usize, radix_mask: usize) -> usize {
    (stage_index + r) & radix_mask
}

/// Offset read by output stream `r` in the column block starting at `time_offset`.
#[inline]
#[must_use]
pub const fn source_offset(r: usize, time_offset: usize) -> usize {
    r + time_offset
}

/// One single-cycle mapping of the `R` lanes onto the `R` output streams.
///
/// Each rule is materialized as its own lane map so that it can be applied without any
/// arithmetic on the stage index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrissCrossRule {
    stage_index: usize,
    /// `source_lanes[r]` is the lane feeding output stream `r`.
    source_lanes: Vec<usize>,
}

impl CrissCrossRule {
    /// Builds rule `stage_index` of a radix-`radix` network.
    ///
    /// # Panics
    /// Panics if `radix` is not a power of two or `stage_index >= radix`.
    #[must_use]
    pub fn new(stage_index: usize, radix: usize) -> Self {
        assert!(radix.is_power_of_two(), "radix {radix} is not a power of two");
        assert!(
            stage_index < radix,
            "stage index {stage_index} out of range for radix {radix}"
        );
        let mask = radix - 1;
        Self {
            stage_index,
            source_lanes: (0..radix).map(|r| source_lane(stage_index, r, mask)).collect(),
        }
    }

    #[must_use]
    pub const fn stage_index(&self) -> usize {
        self.stage_index
    }

    #[must_use]
    pub fn radix(&self) -> usize {
        self.source_lanes.len()
    }

    /// Lane map of the rule, indexed by output stream.
    #[must_use]
    pub fn source_lanes(&self) -> &[usize] {
        &self.source_lanes
    }

    /// Returns `true` if every lane feeds exactly one output stream.
    #[must_use]
    pub fn is_bijection(&self) -> bool {
        let radix = self.radix();
        self.source_lanes.iter().all(|&lane| lane < radix) && self.source_lanes.iter().all_unique()
    }

    /// Writes the `R` samples selected by this rule from the column block at `time_offset`.
    ///
    /// Bounds are the caller's responsibility; an out-of-range read panics.
    #[inline]
    pub fn apply<T: Copy>(&self, time_offset: usize, lanes: &LaneBuffers<T>, out: &mut [T]) {
        for (r, (out, &lane)) in out.iter_mut().zip(&self.source_lanes).enumerate() {
            *out = lanes[(lane, source_offset(r, time_offset))];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Radices exercised exhaustively.
    const RADICES: [usize; 7] = [1, 2, 4, 8, 16, 32, 64];

    /// Reference model of the stage-indexed equality chain.
    ///
    /// Rule `stage` answers when `stage_index == stage - 1` and otherwise defers to rule
    /// `stage - 1`. Rule 1 is the base case and answers unconditionally.
    fn chain_source_lane(stage: usize, stage_index: usize, r: usize, radix: usize) -> usize {
        let mask = radix - 1;
        if stage == 1 {
            return r & mask;
        }
        if stage_index == stage - 1 {
            ((stage - 1) + r) & mask
        } else {
            chain_source_lane(stage - 1, stage_index, r, radix)
        }
    }

    #[test]
    fn test_source_lane() {
        // R = 4, stage 2: lanes [2, 3, 0, 1].
        let lanes: Vec<_> = (0..4).map(|r| source_lane(2, r, 3)).collect();
        assert_eq!(lanes, vec![2, 3, 0, 1]);

        let offsets: Vec<_> = (0..4).map(|r| source_offset(r, 1)).collect();
        assert_eq!(offsets, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rule_lane_map() {
        let rule = CrissCrossRule::new(3, 8);
        assert_eq!(rule.stage_index(), 3);
        assert_eq!(rule.radix(), 8);
        assert_eq!(rule.source_lanes(), &[3, 4, 5, 6, 7, 0, 1, 2]);

        let identity = CrissCrossRule::new(0, 4);
        assert_eq!(identity.source_lanes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_every_rule_is_a_bijection() {
        for radix in RADICES {
            for stage_index in 0..radix {
                let rule = CrissCrossRule::new(stage_index, radix);
                assert!(rule.is_bijection(), "R = {radix}, stage {stage_index}");

                let mut seen = vec![false; radix];
                for &lane in rule.source_lanes() {
                    assert!(!seen[lane]);
                    seen[lane] = true;
                }
                assert!(seen.into_iter().all(|s| s));
            }
        }
    }

    #[test]
    fn test_chain_matches_closed_form() {
        for radix in RADICES {
            for stage_index in 0..radix {
                let rule = CrissCrossRule::new(stage_index, radix);
                for r in 0..radix {
                    let closed_form = (stage_index + r) % radix;
                    assert_eq!(chain_source_lane(radix, stage_index, r, radix), closed_form);
                    assert_eq!(source_lane(stage_index, r, radix - 1), closed_form);
                    assert_eq!(rule.source_lanes()[r], closed_form);
                }
            }
        }
    }

    #[test]
    fn test_chain_falls_back_to_rule_zero_out_of_range() {
        // Past the valid range the chain silently applies rule 0 while the closed form wraps.
        // Neither is meaningful, hence the range check in `CrissCrossRule::new`.
        let radix = 4;
        for r in 0..radix {
            assert_eq!(chain_source_lane(radix, 5, r, radix), r);
            assert_eq!(source_lane(5, r, radix - 1), (5 + r) % radix);
        }
    }

    #[test]
    fn test_apply() {
        let lanes = LaneBuffers::from_banks(
            (0..4)
                .map(|lane| (0..4).map(|offset| 10 * lane + offset).collect())
                .collect(),
        )
        .unwrap();
        let mut out = [0; 4];

        CrissCrossRule::new(2, 4).apply(0, &lanes, &mut out);
        assert_eq!(out, [20, 31, 2, 13]);
    }

    #[test]
    fn test_is_bijection_detects_duplicates() {
        let rule = CrissCrossRule {
            stage_index: 0,
            source_lanes: vec![0, 1, 1, 3],
        };
        assert!(!rule.is_bijection());
    }

    #[test]
    #[should_panic]
    fn test_rule_out_of_range() {
        let _ = CrissCrossRule::new(4, 4);
    }

    #[test]
    #[should_panic]
    fn test_rule_bad_radix() {
        let _ = CrissCrossRule::new(0, 6);
    }
}
