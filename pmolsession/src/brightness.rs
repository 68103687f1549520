/// Pas appliqué par les chemins `/light_bright` et `/light_dim`.
const STEP: u8 = 25;

/// Niveau de luminosité exposé au hub, pourcentage borné à `[0, 100]`.
///
/// La valeur envoyée au device est toujours convertie vers son échelle
/// native `[0, 255]` via [`BrightnessLevel::to_native`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    pub const MIN: BrightnessLevel = BrightnessLevel(0);
    pub const MAX: BrightnessLevel = BrightnessLevel(100);

    /// Construit un niveau en bornant la valeur à `[0, 100]`.
    pub fn clamped(percent: i64) -> Self {
        Self(percent.clamp(0, 100) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Conversion vers l'échelle native : `round(p × 255 / 100)`.
    pub fn to_native(self) -> u8 {
        ((u32::from(self.0) * 255 + 50) / 100) as u8
    }

    /// Incrément d'un pas, plafonné à 100.
    pub fn brighter(self) -> Self {
        Self((self.0 + STEP).min(100))
    }

    /// Décrément d'un pas, plancher à 0.
    pub fn dimmer(self) -> Self {
        Self(self.0.saturating_sub(STEP))
    }
}

impl std::fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
