use serde::Serialize;

/// Upper bound of every normalized component.
pub const NORMALIZED_MAX: f64 = 100.0;

/// Rescale a raw count onto 0-100 against its benchmark, capped at 100.
///
/// `benchmark` must be positive; configs are validated before they reach here.
pub fn normalize(value: f64, benchmark: f64) -> f64 {
    ((value / benchmark) * 100.0).min(NORMALIZED_MAX)
}

/// The three inputs of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    PavedArea,
    TrailerCount,
    GateNodes,
}

impl Component {
    pub const ALL: [Component; 3] = [
        Component::PavedArea,
        Component::TrailerCount,
        Component::GateNodes,
    ];

    /// Key used in JSON output
    pub fn key(&self) -> &'static str {
        match self {
            Component::PavedArea => "paved_area",
            Component::TrailerCount => "trailer_count",
            Component::GateNodes => "gate_nodes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Component::PavedArea => "Paved Area",
            Component::TrailerCount => "Trailer Count",
            Component::GateNodes => "Gate Nodes",
        }
    }

    /// Greek symbol of the weight applied to this component
    pub fn symbol(&self) -> &'static str {
        match self {
            Component::PavedArea => "α",
            Component::TrailerCount => "β",
            Component::GateNodes => "γ",
        }
    }

    fn buckets(&self) -> &'static [Bucket] {
        match self {
            Component::PavedArea => PAVED_BUCKETS,
            Component::TrailerCount => TRAILER_BUCKETS,
            Component::GateNodes => GATE_BUCKETS,
        }
    }

    /// Describe a raw value of this component. First bucket whose minimum is met wins.
    pub fn interpret(&self, value: f64) -> &'static str {
        let buckets = self.buckets();
        buckets
            .iter()
            .find(|bucket| value >= bucket.min)
            .or_else(|| buckets.last())
            .map(|bucket| bucket.text)
            .unwrap_or_default()
    }

    /// Range label and text of every bucket, highest first.
    pub fn interpretation_table(&self) -> Vec<(&'static str, &'static str)> {
        self.buckets().iter().map(|b| (b.range, b.text)).collect()
    }
}

/// Interpretation bucket. The last entry of each table is the catch-all.
struct Bucket {
    min: f64,
    range: &'static str,
    text: &'static str,
}

const PAVED_BUCKETS: &[Bucket] = &[
    Bucket {
        min: 90.0,
        range: "90-100%",
        text: "Mega DC - Maximum land utilization, high complexity",
    },
    Bucket {
        min: 70.0,
        range: "70-89%",
        text: "Standard DC - Good operational footprint",
    },
    Bucket {
        min: 50.0,
        range: "50-69%",
        text: "Mixed-use - Room for optimization",
    },
    Bucket {
        min: f64::NEG_INFINITY,
        range: "<50%",
        text: "Limited paved area - May be office-heavy",
    },
];

const TRAILER_BUCKETS: &[Bucket] = &[
    Bucket {
        min: 200.0,
        range: "200+",
        text: "WHALE territory - Major distribution hub",
    },
    Bucket {
        min: 100.0,
        range: "100-199",
        text: "High-volume facility - Significant throughput",
    },
    Bucket {
        min: 50.0,
        range: "50-99",
        text: "Regional depot - Moderate activity",
    },
    Bucket {
        min: f64::NEG_INFINITY,
        range: "<50",
        text: "Small operation - Limited scale",
    },
];

const GATE_BUCKETS: &[Bucket] = &[
    Bucket {
        min: 4.0,
        range: "4-5",
        text: "Complex multi-flow - High orchestration needs",
    },
    Bucket {
        min: 2.0,
        range: "2-3",
        text: "Standard facility - Some traffic separation",
    },
    Bucket {
        min: f64::NEG_INFINITY,
        range: "1",
        text: "Single entry point - Simple flow",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_linear() {
        assert_eq!(normalize(180.0, 300.0), 60.0);
        assert_eq!(normalize(3.0, 5.0), 60.0);
        assert_eq!(normalize(0.0, 300.0), 0.0);
    }

    #[test]
    fn test_normalize_caps_at_100() {
        assert_eq!(normalize(300.0, 300.0), 100.0);
        assert_eq!(normalize(900.0, 300.0), 100.0);
        assert_eq!(normalize(7.0, 5.0), 100.0);
    }

    #[test]
    fn test_paved_buckets() {
        let c = Component::PavedArea;
        assert_eq!(c.interpret(95.0), "Mega DC - Maximum land utilization, high complexity");
        assert_eq!(c.interpret(90.0), "Mega DC - Maximum land utilization, high complexity");
        assert_eq!(c.interpret(89.9), "Standard DC - Good operational footprint");
        assert_eq!(c.interpret(70.0), "Standard DC - Good operational footprint");
        assert_eq!(c.interpret(50.0), "Mixed-use - Room for optimization");
        assert_eq!(c.interpret(49.9), "Limited paved area - May be office-heavy");
        assert_eq!(c.interpret(0.0), "Limited paved area - May be office-heavy");
    }

    #[test]
    fn test_trailer_buckets() {
        let c = Component::TrailerCount;
        assert_eq!(c.interpret(250.0), "WHALE territory - Major distribution hub");
        assert_eq!(c.interpret(200.0), "WHALE territory - Major distribution hub");
        assert_eq!(c.interpret(199.0), "High-volume facility - Significant throughput");
        assert_eq!(c.interpret(50.0), "Regional depot - Moderate activity");
        assert_eq!(c.interpret(49.0), "Small operation - Limited scale");
    }

    #[test]
    fn test_gate_buckets() {
        let c = Component::GateNodes;
        assert_eq!(c.interpret(5.0), "Complex multi-flow - High orchestration needs");
        assert_eq!(c.interpret(4.0), "Complex multi-flow - High orchestration needs");
        assert_eq!(c.interpret(3.0), "Standard facility - Some traffic separation");
        assert_eq!(c.interpret(2.0), "Standard facility - Some traffic separation");
        assert_eq!(c.interpret(1.0), "Single entry point - Simple flow");
        assert_eq!(c.interpret(0.0), "Single entry point - Simple flow");
    }

    #[test]
    fn test_nan_falls_into_catch_all() {
        assert_eq!(
            Component::PavedArea.interpret(f64::NAN),
            "Limited paved area - May be office-heavy"
        );
    }

    #[test]
    fn test_interpretation_table_order() {
        let table = Component::GateNodes.interpretation_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].0, "4-5");
        assert_eq!(table[2].0, "1");
    }
}
