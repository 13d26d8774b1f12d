use crate::config::RollConfig;
use crate::knowledge::KnowledgeBase;
use crate::runtime::{DiceRoller, RollOutcome, default_roller, describe};
use wasm_bindgen::prelude::*;

// ==========================================
// WebAssembly exports
// ==========================================

#[wasm_bindgen(js_name = rollDice)]
pub fn roll_dice(spec: String) -> Result<RollOutcome, String> {
    default_roller()
        .and_then(|roller| roller.roll(&spec))
        .map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = rollDiceWithConfig)]
pub fn roll_dice_with_config(spec: String, config: RollConfig) -> Result<RollOutcome, String> {
    let knowledge = match default_roller() {
        Ok(roller) => roller.knowledge().clone(),
        Err(_) => KnowledgeBase::builtin().map_err(|e| e.to_string())?,
    };
    DiceRoller::with_config(knowledge, config)
        .roll(&spec)
        .map_err(|e| e.to_string())
}

/// `rolls` is an array of numbers.
#[wasm_bindgen(js_name = describeRolls)]
pub fn describe_rolls(rolls: JsValue) -> Result<String, String> {
    let rolls: Vec<i64> = serde_wasm_bindgen::from_value(rolls).map_err(|e| e.to_string())?;
    Ok(describe(&rolls))
}
