//! Fixed vocabularies for product type, strain type, effects and terpenes.
//!
//! Variants serialize as their display names (`"Flower"`, `"Indica"`, ...),
//! which is also what the forms show.

use serde::{Deserialize, Serialize};

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every tag in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            /// Case-insensitive lookup by display name.
            pub fn parse(s: &str) -> Option<Self> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Form factor of the reviewed product.
    ProductType { Flower, Edible, Concentrate, Vape, Tincture, Topical }
}

vocabulary! {
    /// Strain lineage.
    StrainType { Hybrid, Indica, Sativa }
}

vocabulary! {
    /// Reported effect tags.
    Effect {
        Relaxed, Happy, Euphoric, Uplifted, Creative, Energetic,
        Focused, Sleepy, Hungry, Talkative, Tingly, Giggly,
    }
}

vocabulary! {
    /// Dominant terpene tags.
    Terpene {
        Myrcene, Limonene, Caryophyllene, Pinene, Linalool,
        Humulene, Terpinolene, Ocimene, Bisabolol,
    }
}

impl Default for ProductType {
    fn default() -> Self {
        Self::Flower
    }
}

impl Default for StrainType {
    fn default() -> Self {
        Self::Hybrid
    }
}
