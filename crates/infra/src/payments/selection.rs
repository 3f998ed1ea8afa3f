use std::sync::Arc;

use tracing::{info, warn};
use wastewise_core::{GatewayError, PaymentGateway};
use wastewise_domain::{Environment, PaymentConfig};

use super::simulated::SimulatedGateway;

/// Choose the checkout gateway for this build
///
/// An injected real gateway always wins. Without one, the simulated gateway
/// is used only when no gateway key is configured, the environment is not
/// production and simulation is enabled; every other combination is an
/// error rather than a silent fallback.
///
/// # Errors
/// - `GatewayError::Misconfigured` when a key is configured but no real
///   gateway was provided, or simulation is requested in production
/// - `GatewayError::Unavailable` when simulation is disabled
pub fn select_gateway(
    config: &PaymentConfig,
    real: Option<Arc<dyn PaymentGateway>>,
) -> Result<Arc<dyn PaymentGateway>, GatewayError> {
    if let Some(gateway) = real {
        info!(environment = %config.environment, "Using checkout gateway");
        return Ok(gateway);
    }

    if config.gateway_key_id.as_deref().is_some_and(|key| !key.trim().is_empty()) {
        return Err(GatewayError::Misconfigured(
            "a gateway key is configured but no checkout gateway was provided".to_string(),
        ));
    }
    if config.environment == Environment::Production {
        return Err(GatewayError::Misconfigured(
            "simulated payments are not allowed in production".to_string(),
        ));
    }
    if !config.simulation.enabled {
        return Err(GatewayError::Unavailable("no checkout gateway configured".to_string()));
    }

    warn!(
        environment = %config.environment,
        failure_rate = config.simulation.failure_rate,
        "No gateway key configured, using simulated payments"
    );
    Ok(Arc::new(SimulatedGateway::from_config(&config.simulation)))
}
