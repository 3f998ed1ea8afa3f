use tracing::info;
use wastewise_domain::{
    BadgeCollection, Challenge, Leaderboard, LeaderboardPeriod, PointsOverview, PointsSummary,
    RedeemRequest, RedeemResponse, Redemption, RewardCatalog,
};

use crate::api::{ApiError, ApiRequest, WasteWiseClient};

const POINTS_FALLBACK: &str = "Failed to load points";

impl WasteWiseClient {
    /// Current points, normalised whatever shape the backend answers with
    pub async fn points(&self) -> Result<PointsSummary, ApiError> {
        let body = self.call(ApiRequest::get("/rewards/points"), POINTS_FALLBACK).await?;
        Ok(PointsSummary::from_response(&body)?)
    }

    /// Points summary plus recent transactions and the next milestone
    pub async fn points_overview(&self) -> Result<PointsOverview, ApiError> {
        let body = self.call(ApiRequest::get("/rewards/points"), POINTS_FALLBACK).await?;
        Ok(PointsOverview::from_response(&body)?)
    }

    pub async fn badges(&self) -> Result<BadgeCollection, ApiError> {
        self.call_as(ApiRequest::get("/rewards/badges"), "Failed to load badges").await
    }

    pub async fn challenges(&self) -> Result<Vec<Challenge>, ApiError> {
        let request = ApiRequest::get("/rewards/challenges");
        self.call_field(request, "challenges", "Failed to load challenges").await
    }

    pub async fn reward_catalog(&self) -> Result<RewardCatalog, ApiError> {
        self.call_as(ApiRequest::get("/rewards/catalog"), "Failed to load rewards").await
    }

    pub async fn leaderboard(&self, period: LeaderboardPeriod) -> Result<Leaderboard, ApiError> {
        let request =
            ApiRequest::get("/rewards/leaderboard").query([("period", period.to_string())]);
        self.call_as(request, "Failed to load leaderboard").await
    }

    pub async fn redeem_reward(
        &self,
        reward_id: &str,
        quantity: u32,
    ) -> Result<RedeemResponse, ApiError> {
        if reward_id.trim().is_empty() || quantity == 0 {
            return Err(ApiError::Validation("Reward and a positive quantity are required".into()));
        }

        let body = RedeemRequest { reward_id: reward_id.to_string(), quantity };
        let request = ApiRequest::post("/rewards/redeem").json(&body)?;
        let response: RedeemResponse = self.call_as(request, "Failed to redeem reward").await?;
        info!(reward_id, quantity, balance = ?response.new_point_balance, "Reward redeemed");
        Ok(response)
    }

    pub async fn redemptions(&self) -> Result<Vec<Redemption>, ApiError> {
        let request = ApiRequest::get("/rewards/redemptions");
        self.call_field(request, "redemptions", "Failed to load redemptions").await
    }
}
