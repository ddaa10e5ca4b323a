/// Aggregated view of game progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProgress {
    pub total: u32,
    pub answered: u32,
    pub remaining: u32,
    pub score: u32,
    pub is_complete: bool,
}
