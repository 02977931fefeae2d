use std::fmt::{self, Write};

/// Label of a single tier in a [`UnitScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Fixed(&'static str),
    /// Singular is used only when the scaled amount is exactly 1.
    Counted { singular: &'static str, plural: &'static str },
}

impl Label {
    fn resolve(&self, amount: f64) -> &'static str {
        return match *self {
            Label::Fixed(label) => label,
            Label::Counted { singular, .. } if amount == 1.0 => singular,
            Label::Counted { plural, .. } => plural,
        };
    }
}

/// Tiers ordered by descending threshold; the last tier is always 1.
pub struct UnitScale {
    tiers: [(f64, Label); 9],
}

impl UnitScale {
    pub fn tiers(&self) -> &[(f64, Label)] {
        return &self.tiers;
    }

    fn select(&self, bytes: f64) -> (f64, Label) {
        return self.tiers.iter()
            .find(|(threshold, _)| bytes >= *threshold)
            .copied()
            .unwrap_or(self.tiers[self.tiers.len() - 1]);
    }
}

macro_rules! tiers {
    ($base:expr, [$($label:expr),* $(,)?]) => {{
        const B: f64 = $base;
        const B2: f64 = B * B;
        const B4: f64 = B2 * B2;
        let labels = [$($label),*];
        [
            (B4 * B4, labels[0]),
            (B4 * B2 * B, labels[1]),
            (B4 * B2, labels[2]),
            (B4 * B, labels[3]),
            (B4, labels[4]),
            (B2 * B, labels[5]),
            (B2, labels[6]),
            (B, labels[7]),
            (1.0, labels[8]),
        ]
    }};
}

const fn fixed(label: &'static str) -> Label {
    return Label::Fixed(label);
}

const fn counted(singular: &'static str, plural: &'static str) -> Label {
    return Label::Counted { singular, plural };
}

/// Y, Z, E, P, T, G, M, K, B
pub static TRADITIONAL: UnitScale = UnitScale {
    tiers: tiers!(1024.0, [
        fixed("Y"), fixed("Z"), fixed("E"), fixed("P"), fixed("T"),
        fixed("G"), fixed("M"), fixed("K"), fixed("B"),
    ]),
};

/// What most desktops show: " KB", " MB", ... and " byte"/" bytes".
pub static ALTERNATIVE: UnitScale = UnitScale {
    tiers: tiers!(1024.0, [
        fixed(" YB"), fixed(" ZB"), fixed(" EB"), fixed(" PB"), fixed(" TB"),
        fixed(" GB"), fixed(" MB"), fixed(" KB"), counted(" byte", " bytes"),
    ]),
};

pub static VERBOSE: UnitScale = UnitScale {
    tiers: tiers!(1024.0, [
        fixed(" yottabytes"),
        fixed(" zettabytes"),
        fixed(" exabytes"),
        counted(" petabyte", " petabytes"),
        counted(" terabyte", " terabytes"),
        counted(" gigabyte", " gigabytes"),
        counted(" megabyte", " megabytes"),
        counted(" kilobyte", " kilobytes"),
        counted(" byte", " bytes"),
    ]),
};

pub static IEC: UnitScale = UnitScale {
    tiers: tiers!(1024.0, [
        fixed("Yi"), fixed("Zi"), fixed("Ei"), fixed("Pi"), fixed("Ti"),
        fixed("Gi"), fixed("Mi"), fixed("Ki"), fixed(""),
    ]),
};

/// Powers of 1000 rather than 1024.
pub static SI: UnitScale = UnitScale {
    tiers: tiers!(1000.0, [
        fixed("Y"), fixed("Z"), fixed("E"), fixed("P"), fixed("T"),
        fixed("G"), fixed("M"), fixed("K"), fixed("B"),
    ]),
};

/// Renders `bytes` in the largest unit of `scale` it fits, with two decimals.
pub fn format_size(bytes: f64, scale: &UnitScale) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_size(&mut out, bytes, scale);
    return out;
}

fn write_size<W: Write>(out: &mut W, bytes: f64, scale: &UnitScale) -> fmt::Result {
    let bytes = if bytes.is_nan() || bytes < 0.0 { 0.0 } else { bytes };
    let (threshold, label) = scale.select(bytes);
    let amount = bytes / threshold;
    return write!(out, "{:.2}{}", amount, label.resolve(amount));
}

pub struct ByteCount {
    bytes: u64,
    scale: &'static UnitScale,
}

impl ByteCount {
    pub fn with_scale(bytes: u64, scale: &'static UnitScale) -> Self {
        return ByteCount { bytes, scale };
    }
}

impl From<u64> for ByteCount {
    fn from(value: u64) -> Self {
        return ByteCount { bytes: value, scale: &ALTERNATIVE };
    }
}

impl fmt::Display for ByteCount {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        return write_size(formatter, self.bytes as f64, self.scale);
    }
}
