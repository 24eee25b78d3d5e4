// ============================================================
// Layer 3 - Fashion-MNIST Class Labels
// ============================================================
// Fashion-MNIST stores labels as bytes 0..=9. Each byte maps to
// one clothing category. The mapping below is the canonical one
// published with the dataset and is used everywhere a prediction
// or a sample gets printed.

use std::fmt;

/// One of the ten Fashion-MNIST categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FashionClass {
    TShirtTop,
    Trouser,
    Pullover,
    Dress,
    Coat,
    Sandal,
    Shirt,
    Sneaker,
    Bag,
    AnkleBoot,
}

/// Number of classes in the dataset
pub const NUM_CLASSES: usize = 10;

impl FashionClass {
    /// All classes in label order (index i has label byte i)
    pub const ALL: [FashionClass; NUM_CLASSES] = [
        FashionClass::TShirtTop,
        FashionClass::Trouser,
        FashionClass::Pullover,
        FashionClass::Dress,
        FashionClass::Coat,
        FashionClass::Sandal,
        FashionClass::Shirt,
        FashionClass::Sneaker,
        FashionClass::Bag,
        FashionClass::AnkleBoot,
    ];

    /// Look up a class from its label index.
    /// Returns None for anything outside 0..=9.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The label index of this class
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable name, as printed by the tutorials
    pub fn name(self) -> &'static str {
        match self {
            FashionClass::TShirtTop => "T-shirt/top",
            FashionClass::Trouser   => "Trouser",
            FashionClass::Pullover  => "Pullover",
            FashionClass::Dress     => "Dress",
            FashionClass::Coat      => "Coat",
            FashionClass::Sandal    => "Sandal",
            FashionClass::Shirt     => "Shirt",
            FashionClass::Sneaker   => "Sneaker",
            FashionClass::Bag       => "Bag",
            FashionClass::AnkleBoot => "Ankle boot",
        }
    }
}

impl fmt::Display for FashionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
