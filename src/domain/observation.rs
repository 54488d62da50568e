/// Inbound sensor tokens.
///
/// Wire vocabulary (one cycle carries any number of these):
///   blocked | steps | breeze | flash | damage | hit | enemy#<steps>
///   blueLight      gold
///   blueLight#1    ring
///   blueLight#2    coin
///   redLight[#N]   potion restoring N energy
///
/// `damage` means the agent was shot; `hit` means the agent's shot landed.

use std::str::FromStr;

use tracing::debug;

use super::action::ItemKind;
use crate::error::ObservationError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Observation {
    Blocked,
    Steps,
    Breeze,
    Flash,
    Item { kind: ItemKind, power: Option<u32> },
    Damage,
    Hit,
    Enemy(u32),
}

impl FromStr for Observation {
    type Err = ObservationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let (name, param) = match token.split_once('#') {
            Some((n, p)) => (n, Some(p)),
            None => (token, None),
        };

        let malformed = || ObservationError::MalformedParameter(token.to_string());
        let number = |p: &str| p.trim().parse::<u32>().map_err(|_| malformed());

        let obs = match (name, param) {
            ("blocked", None) => Observation::Blocked,
            ("steps", None) => Observation::Steps,
            ("breeze", None) => Observation::Breeze,
            ("flash", None) => Observation::Flash,
            ("damage", None) => Observation::Damage,
            ("hit", None) => Observation::Hit,
            ("enemy", Some(p)) => Observation::Enemy(number(p)?),
            ("blueLight", None) => Observation::Item { kind: ItemKind::Gold, power: None },
            ("blueLight", Some(p)) => match number(p)? {
                1 => Observation::Item { kind: ItemKind::Ring, power: None },
                2 => Observation::Item { kind: ItemKind::Coin, power: None },
                _ => return Err(ObservationError::Unknown(token.to_string())),
            },
            ("redLight", None) => Observation::Item { kind: ItemKind::Potion, power: None },
            ("redLight", Some(p)) => Observation::Item {
                kind: ItemKind::Potion,
                power: Some(number(p)?),
            },
            _ => return Err(ObservationError::Unknown(token.to_string())),
        };
        Ok(obs)
    }
}

/// Parse a batch, dropping unusable tokens and keeping the rest.
pub fn parse_batch<S: AsRef<str>>(tokens: &[S]) -> Vec<Observation> {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.trim().is_empty())
        .filter_map(|t| match t.parse::<Observation>() {
            Ok(obs) => Some(obs),
            Err(err) => {
                debug!(%err, "dropping observation token");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tokens() {
        assert_eq!("breeze".parse(), Ok(Observation::Breeze));
        assert_eq!("flash".parse(), Ok(Observation::Flash));
        assert_eq!("blocked".parse(), Ok(Observation::Blocked));
        assert_eq!("damage".parse(), Ok(Observation::Damage));
    }

    #[test]
    fn light_variants() {
        assert_eq!(
            "blueLight".parse(),
            Ok(Observation::Item { kind: ItemKind::Gold, power: None })
        );
        assert_eq!(
            "blueLight#1".parse(),
            Ok(Observation::Item { kind: ItemKind::Ring, power: None })
        );
        assert_eq!(
            "blueLight#2".parse(),
            Ok(Observation::Item { kind: ItemKind::Coin, power: None })
        );
        assert_eq!(
            "redLight#20".parse(),
            Ok(Observation::Item { kind: ItemKind::Potion, power: Some(20) })
        );
    }

    #[test]
    fn enemy_distance() {
        assert_eq!("enemy#4".parse(), Ok(Observation::Enemy(4)));
        assert!(matches!(
            "enemy#far".parse::<Observation>(),
            Err(ObservationError::MalformedParameter(_))
        ));
    }

    #[test]
    fn batch_drops_bad_tokens_keeps_rest() {
        let obs = parse_batch(&["enemy#x", "breeze", "greenLight", "", "enemy#3"]);
        assert_eq!(obs, vec![Observation::Breeze, Observation::Enemy(3)]);
    }
}
