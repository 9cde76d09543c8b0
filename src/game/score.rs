use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Amazing,
    Excellent,
    Ok,
    Lacking,
    Suffering,
    MindEscaped,
}

impl Classification {
    pub fn message(self) -> &'static str {
        match self {
            Classification::Amazing => "AMAZING!",
            Classification::Excellent => "Excellent!",
            Classification::Ok => "OK!",
            Classification::Lacking => "Lacking!",
            Classification::Suffering => "Suffering!",
            Classification::MindEscaped => "Mind has escaped...",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Percentage of attempts that were matches.
///
/// The ratio is taken in floating point and cast down, so a product that
/// lands just below a whole number loses that point: 29 of 100 scores 28.
pub fn compute_score(attempts: u32, matches: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    ((f64::from(matches) / f64::from(attempts)) * 100.0) as u32
}

pub fn classify(score: u32) -> Classification {
    if score > 97 {
        Classification::Amazing
    } else if score > 80 {
        Classification::Excellent
    } else if score > 60 {
        Classification::Ok
    } else if score > 30 {
        Classification::Lacking
    } else if score > 10 {
        Classification::Suffering
    } else {
        Classification::MindEscaped
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Score {
    pub value: u32,
    pub classification: Classification,
}

impl Score {
    pub fn from_counts(attempts: u32, matches: u32) -> Self {
        let value = compute_score(attempts, matches);
        Self {
            value,
            classification: classify(value),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Your score is {}, {}", self.value, self.classification)
    }
}
