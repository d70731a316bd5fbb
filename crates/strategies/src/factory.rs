use crate::types::StrategyParams;
use crate::{Result, Strategy, TenDayLine};

/// Validates the parameters and builds the strategy the engine runs.
pub fn build_strategy(params: &StrategyParams) -> Result<Box<dyn Strategy + Send + Sync>> {
    params.validate()?;
    Ok(Box::new(TenDayLine::new(params.clone())))
}
