//! Backend contract types
//!
//! Known fields are typed; fields the client does not interpret are kept in
//! flattened `extra` maps so nothing is lost on a round trip.

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod classification;
pub mod payments;
pub mod rewards;
pub mod services;

pub use analytics::{
    AnalyticsPeriod, AnalyticsReport, ExportFormat, ExportRequest, ExportResponse, ExportScope,
};
pub use auth::{
    Acknowledgement, AuthResponse, AuthTokens, LoginRequest, PasswordChange, ProfileUpdate,
    RegisterRequest, UserProfile,
};
pub use bookings::{
    Booking, BookingFilter, BookingPage, BookingStatus, BookingTracking, CreateBooking,
    RatingRequest, RatingResponse, RescheduleRequest, WasteType,
};
pub use classification::{Classification, ClassificationResult, ImageUpload};
pub use payments::{
    InitiatePayment, PaymentHistory, PaymentMethod, PaymentMethods, PaymentOrder, PaymentRecord,
    RefundResponse, VerifyPayment, VerifyResponse,
};
pub use rewards::{
    Badge, BadgeCollection, Challenge, Leaderboard, LeaderboardEntry, LeaderboardPeriod,
    PointTransaction, PointsOverview, PointsSummary, RedeemRequest, RedeemResponse, Redemption,
    Reward, RewardCatalog,
};
pub use services::{Pagination, ProviderPage, Review, ReviewPage, ServiceProvider, ServiceSearch};
