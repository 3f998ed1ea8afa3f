//! Gamified rewards: points, badges, challenges and the redemption catalog

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_domain_status_conversions;
use crate::utils::serde::{id_string, option_id_string};
use crate::{Result, WasteWiseError};

/// The single representation of a user's points
///
/// `/rewards/points` has returned both a bare number and an object over
/// time; [`PointsSummary::from_response`] accepts either so callers never
/// branch on the shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsSummary {
    pub current_balance: i64,
    pub total_earned: i64,
    pub total_spent: i64,
    pub weekly_earned: i64,
}

impl PointsSummary {
    /// A bare balance with no history
    pub fn from_balance(balance: i64) -> Self {
        Self { current_balance: balance, total_earned: balance.max(0), ..Self::default() }
    }

    /// Normalise a points response body.
    ///
    /// Accepted shapes: `42`, `{"points": 42}`, `{"points": {...}}` and a
    /// bare summary object.
    ///
    /// # Errors
    /// Returns `WasteWiseError::Serialization` for any other shape.
    pub fn from_response(body: &Value) -> Result<Self> {
        let points = body.get("points").unwrap_or(body);
        match points {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .map(Self::from_balance)
                .ok_or_else(|| WasteWiseError::Serialization(format!("Invalid points value {n}"))),
            Value::Object(_) => Ok(serde_json::from_value(points.clone())?),
            other => {
                Err(WasteWiseError::Serialization(format!("Unexpected points payload: {other}")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTransaction {
    #[serde(default)]
    pub points: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full `/rewards/points` payload with the normalised summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointsOverview {
    pub summary: PointsSummary,
    pub recent_transactions: Vec<PointTransaction>,
    pub next_milestone: Option<Value>,
}

impl PointsOverview {
    /// # Errors
    /// Propagates [`PointsSummary::from_response`] failures.
    pub fn from_response(body: &Value) -> Result<Self> {
        let summary = PointsSummary::from_response(body)?;
        let recent_transactions = match body.get("recent_transactions") {
            Some(list) => serde_json::from_value(list.clone())?,
            None => Vec::new(),
        };
        let next_milestone = body.get("next_milestone").cloned();
        Ok(Self { summary, recent_transactions, next_milestone })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BadgeCollection {
    #[serde(default)]
    pub earned_badges: Vec<Badge>,
    #[serde(default)]
    pub available_badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub points_reward: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub points_cost: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RewardCatalog {
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub categories: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedeemRequest {
    pub reward_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RedeemResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redemption: Option<Value>,
    #[serde(default)]
    pub new_point_balance: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    #[serde(default, deserialize_with = "option_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "option_id_string")]
    pub reward_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeaderboardPeriod {
    #[default]
    Weekly,
    Monthly,
    AllTime,
}

impl_domain_status_conversions!(LeaderboardPeriod {
    Weekly => "weekly",
    Monthly => "monthly",
    AllTime => "all-time",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default, deserialize_with = "option_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub current_user_rank: Option<Value>,
}
