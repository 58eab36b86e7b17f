pub mod calculators;
pub mod combatant;
pub mod engine;
pub mod state;
pub mod status;

#[cfg(test)]
mod tests;
