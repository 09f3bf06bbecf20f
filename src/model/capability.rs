//! Responder capability enum and bitset.

use std::fmt;
use std::str::FromStr;

/// The category of incident a unit can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Fire,
    Medical,
    Police,
}

impl Capability {
    /// All capabilities in declaration order.
    pub const ALL: [Capability; 3] = [Capability::Fire, Capability::Medical, Capability::Police];

    fn bit(self) -> u8 {
        match self {
            Capability::Fire => 0b001,
            Capability::Medical => 0b010,
            Capability::Police => 0b100,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Fire => "fire",
            Capability::Medical => "medical",
            Capability::Police => "police",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fire" => Ok(Capability::Fire),
            "medical" => Ok(Capability::Medical),
            "police" => Ok(Capability::Police),
            _ => Err(format!(
                "unknown capability \"{s}\", expected fire, medical, or police"
            )),
        }
    }
}

/// A set of capabilities packed into a `u8`.
///
/// Matching between a unit and an incident is plain set intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    /// The set containing all capabilities.
    pub const ALL: CapabilitySet = CapabilitySet(0b111);

    /// Builds a set from a slice of capabilities.
    pub fn of(caps: &[Capability]) -> Self {
        caps.iter().fold(Self::EMPTY, |set, &c| set.with(c))
    }

    /// Returns a copy of the set with `cap` added.
    pub fn with(self, cap: Capability) -> Self {
        CapabilitySet(self.0 | cap.bit())
    }

    /// Returns `true` when `cap` is a member.
    pub fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    /// Returns `true` when the two sets share at least one capability.
    pub fn intersects(self, other: CapabilitySet) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when the set has no members.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for cap in self.iter() {
            if !first {
                write!(f, "+")?;
            }
            write!(f, "{cap}")?;
            first = false;
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_and_contains() {
        let set = CapabilitySet::of(&[Capability::Fire, Capability::Medical]);
        assert!(set.contains(Capability::Fire));
        assert!(set.contains(Capability::Medical));
        assert!(!set.contains(Capability::Police));
    }

    #[test]
    fn intersection() {
        let fire = CapabilitySet::of(&[Capability::Fire]);
        let fire_medical = CapabilitySet::of(&[Capability::Fire, Capability::Medical]);
        let police = CapabilitySet::of(&[Capability::Police]);
        assert!(fire.intersects(fire_medical));
        assert!(!fire.intersects(police));
        assert!(!CapabilitySet::EMPTY.intersects(CapabilitySet::ALL));
    }

    #[test]
    fn parse_known_and_unknown() {
        assert_eq!("fire".parse::<Capability>(), Ok(Capability::Fire));
        assert_eq!("medical".parse::<Capability>(), Ok(Capability::Medical));
        assert_eq!("police".parse::<Capability>(), Ok(Capability::Police));
        assert!("rescue".parse::<Capability>().is_err());
    }

    #[test]
    fn display_joins_members() {
        let set = CapabilitySet::of(&[Capability::Fire, Capability::Police]);
        assert_eq!(set.to_string(), "fire+police");
        assert_eq!(CapabilitySet::EMPTY.to_string(), "none");
    }
}
