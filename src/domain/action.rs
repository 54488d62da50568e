/// Outbound action tokens and the collectible item kinds they pick up.

use std::fmt;

/// Exactly one of these is emitted per decision cycle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
    Shoot,
    PickGold,
    PickRing,
    PickPowerup,
    NoOp,
}

impl Action {
    pub fn as_token(self) -> &'static str {
        match self {
            Action::TurnLeft => "turn-left",
            Action::TurnRight => "turn-right",
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::Shoot => "shoot",
            Action::PickGold => "pick-gold",
            Action::PickRing => "pick-ring",
            Action::PickPowerup => "pick-powerup",
            Action::NoOp => "no-op",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

// ── Items ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ItemKind {
    Gold,
    Ring,
    Coin,
    Potion,
}

impl ItemKind {
    /// Pickup precedence when several items share a cell.
    pub const PICKUP_ORDER: [ItemKind; 4] =
        [ItemKind::Gold, ItemKind::Ring, ItemKind::Coin, ItemKind::Potion];

    /// Everything that scores points rather than restoring energy.
    pub const TREASURE: [ItemKind; 3] = [ItemKind::Gold, ItemKind::Ring, ItemKind::Coin];

    /// Base reward used to rank known items. Potions are ranked by the
    /// energy they restore when known (see `KnowledgeMap::best_known_item`).
    pub fn reward(self) -> u32 {
        match self {
            ItemKind::Gold => 1000,
            ItemKind::Ring => 500,
            ItemKind::Coin => 250,
            ItemKind::Potion => 10,
        }
    }

    pub fn pickup_action(self) -> Action {
        match self {
            ItemKind::Gold => Action::PickGold,
            ItemKind::Ring | ItemKind::Coin => Action::PickRing,
            ItemKind::Potion => Action::PickPowerup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct() {
        let all = [
            Action::TurnLeft, Action::TurnRight, Action::Forward, Action::Backward,
            Action::Shoot, Action::PickGold, Action::PickRing, Action::PickPowerup,
            Action::NoOp,
        ];
        let mut tokens: Vec<&str> = all.iter().map(|a| a.as_token()).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), all.len());
    }

    #[test]
    fn coin_and_ring_share_pickup() {
        assert_eq!(ItemKind::Coin.pickup_action(), Action::PickRing);
        assert_eq!(ItemKind::Potion.pickup_action(), Action::PickPowerup);
    }
}
