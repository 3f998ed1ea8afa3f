//! Degraded-mode checkout
//!
//! Stands in for the checkout widget when no gateway key is configured. It
//! settles every checkout after a fixed delay and declines a configurable
//! fraction of them. Only [`select_gateway`](super::select_gateway) builds
//! one, so it can never shadow a configured real gateway.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;
use wastewise_core::{
    CheckoutCallbacks, CheckoutOptions, GatewayError, GatewayFailure, GatewaySuccess,
    PaymentGateway,
};
use wastewise_domain::constants::{SIMULATED_DECLINE_REASON, SIMULATED_PAYMENT_PREFIX};
use wastewise_domain::SimulationConfig;

const DECLINE_CODE: &str = "SIMULATED_DECLINE";

#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedGateway {
    pub(crate) fn new(delay: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() { 0.0 } else { failure_rate.clamp(0.0, 1.0) };
        Self { delay, failure_rate }
    }

    pub(crate) fn from_config(config: &SimulationConfig) -> Self {
        Self::new(Duration::from_millis(config.delay_ms), config.failure_rate)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// Short enough for the backend to recognise as a test payment
    fn payment_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{SIMULATED_PAYMENT_PREFIX}{}", &suffix[..8])
    }
}

impl PaymentGateway for SimulatedGateway {
    fn open(
        &self,
        options: CheckoutOptions,
        callbacks: CheckoutCallbacks,
    ) -> Result<(), GatewayError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| GatewayError::Unavailable(format!("No async runtime: {e}")))?;

        let delay = self.delay;
        let declined = rand::thread_rng().gen_bool(self.failure_rate);
        debug!(order_id = %options.order_id, ?delay, "Simulated checkout opened");

        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if callbacks.is_settled() {
                return;
            }

            if declined {
                info!(order_id = %options.order_id, "Simulated checkout declined");
                callbacks.on_failure(GatewayFailure {
                    code: Some(DECLINE_CODE.to_string()),
                    reason: SIMULATED_DECLINE_REASON.to_string(),
                });
            } else {
                let payment_id = Self::payment_id();
                info!(order_id = %options.order_id, %payment_id, "Simulated checkout succeeded");
                callbacks.on_success(GatewaySuccess {
                    signature: format!("sim_signature_{payment_id}"),
                    order_id: options.order_id,
                    payment_id,
                });
            }
        });
        Ok(())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
