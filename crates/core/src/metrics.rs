//! Binary classification metrics and the per-variant report printed by the
//! trainer.

use std::fmt;

use serde::Serialize;

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Classification report over the two labels `false` (0) and `true` (1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Indexed by label: `[0]` for not reserved, `[1]` for reserved.
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

/// Ratio that yields zero instead of NaN for an empty denominator.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Fraction of predictions equal to the truth. Zero for no rows.
pub fn accuracy(truth: &[bool], predicted: &[bool]) -> f64 {
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|&(t, p)| t == p)
        .count();
    ratio(correct, truth.len())
}

impl ClassificationReport {
    /// Compare `predicted` against `truth` row by row.
    pub fn compute(truth: &[bool], predicted: &[bool]) -> Self {
        let classes = [false, true].map(|label| {
            let support = truth.iter().filter(|&&t| t == label).count();
            let predicted_as = predicted.iter().filter(|&&p| p == label).count();
            let hits = truth
                .iter()
                .zip(predicted)
                .filter(|&(&t, &p)| t == label && p == label)
                .count();
            let precision = ratio(hits, predicted_as);
            let recall = ratio(hits, support);
            ClassMetrics {
                precision,
                recall,
                f1: f1(precision, recall),
                support,
            }
        });

        let total = truth.len();
        let macro_avg = ClassMetrics {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: total,
        };
        let weight = |pick: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes
                    .iter()
                    .map(|c| pick(c) * c.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weight(|c: &ClassMetrics| c.precision),
            recall: weight(|c: &ClassMetrics| c.recall),
            f1: weight(|c: &ClassMetrics| c.f1),
            support: total,
        };

        Self {
            classes,
            accuracy: accuracy(truth, predicted),
            macro_avg,
            weighted_avg,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (label, m) in self.classes.iter().enumerate() {
            writeln!(
                f,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
