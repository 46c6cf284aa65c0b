//! The all-or-nothing parlay rule.
//!
//! Every grouping strategy scores its groups through [`GroupScore::tally`];
//! there is no other implementation of the win/loss/push rule.

use serde::{Deserialize, Serialize};

use crate::models::PickResult;

/// Non-losing legs a group needs before it counts as a parlay.
pub const MIN_PARLAY_LEGS: u32 = 2;

/// Why a group scored what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// At least one leg is unresolved; the 0 is not final
    Pending,
    /// A leg lost
    Busted,
    /// Fewer than two non-losing legs
    #[default]
    Short,
    Scored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupScore {
    pub points: u32,
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub pending: u32,
    pub status: GroupStatus,
}

impl GroupScore {
    /// Apply the parlay rule to one group of results.
    ///
    /// A loss busts the group, an unresolved leg holds it at 0, fewer than two
    /// non-losing legs is worth nothing, otherwise each win is a point and
    /// pushes ride along for free.
    pub fn tally<I>(results: I) -> Self
    where
        I: IntoIterator<Item = PickResult>,
    {
        let mut score = GroupScore::default();
        for result in results {
            match result {
                PickResult::Win => score.wins += 1,
                PickResult::Push => score.pushes += 1,
                PickResult::Loss => score.losses += 1,
                PickResult::Pending => score.pending += 1,
            }
        }

        let status = if score.losses > 0 {
            GroupStatus::Busted
        } else if score.pending > 0 {
            GroupStatus::Pending
        } else if score.wins + score.pushes < MIN_PARLAY_LEGS {
            GroupStatus::Short
        } else {
            GroupStatus::Scored
        };

        if status == GroupStatus::Scored {
            score.points = score.wins;
        }
        score.status = status;
        score
    }

    pub fn legs(&self) -> u32 {
        self.wins + self.pushes + self.losses + self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.status == GroupStatus::Pending
    }
}

/// Points for one group under the parlay rule.
pub fn score_group<I>(results: I) -> u32
where
    I: IntoIterator<Item = PickResult>,
{
    GroupScore::tally(results).points
}
