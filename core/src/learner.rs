use std::fmt;

/// Engine task a learner name resolves to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TaskMapping {
    Implemented {
        task: &'static str,
        detector: Option<&'static str>,
    },
    /// Accepted on the command line, but no engine task has been chosen for it.
    Unimplemented,
}

/// Active-learning strategy under evaluation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LearnerChoice {
    Pal,
    ZliobaiteSplit,
    ZliobaiteVarUncertainty,
    Random,
    FixedUncertainty,
    RandVarUncertainty,
}

impl LearnerChoice {
    pub const ALL: [Self; 6] = [
        Self::Pal,
        Self::ZliobaiteSplit,
        Self::ZliobaiteVarUncertainty,
        Self::Random,
        Self::FixedUncertainty,
        Self::RandVarUncertainty,
    ];

    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.name() == value)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pal => "PAL",
            Self::ZliobaiteSplit => "ZliobaiteSplit",
            Self::ZliobaiteVarUncertainty => "ZliobaiteVarUncertainty",
            Self::Random => "Random",
            Self::FixedUncertainty => "FixedUncertainty",
            Self::RandVarUncertainty => "RandVarUncertainty",
        }
    }

    pub fn mapping(&self) -> TaskMapping {
        match self {
            Self::Pal => TaskMapping::Implemented {
                task: "PALStream",
                detector: None,
            },
            Self::ZliobaiteSplit => TaskMapping::Implemented {
                task: "ALZliobaite2011",
                detector: Some("SelSampling"),
            },
            Self::ZliobaiteVarUncertainty => TaskMapping::Implemented {
                task: "ALZliobaite2011",
                detector: Some("VarUncertainty"),
            },
            Self::Random => TaskMapping::Implemented {
                task: "ALRandom",
                detector: None,
            },
            Self::FixedUncertainty | Self::RandVarUncertainty => TaskMapping::Unimplemented,
        }
    }

    /// Learner token as it appears in the task description, e.g.
    /// `ALZliobaite2011 -d SelSampling`.
    pub fn task_token(&self) -> Option<String> {
        match self.mapping() {
            TaskMapping::Implemented {
                task,
                detector: Some(detector),
            } => Some(format!("{task} -d {detector}")),
            TaskMapping::Implemented {
                task,
                detector: None,
            } => Some(task.to_string()),
            TaskMapping::Unimplemented => None,
        }
    }

    pub fn accepted_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::name).collect()
    }
}

impl fmt::Display for LearnerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifier wrapped by the learner's labelling policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BaseLearnerChoice {
    NaiveBayes,
    HoeffdingAdaptiveTree,
    AccuracyUpdatedEnsemble,
}

impl BaseLearnerChoice {
    pub const ALL: [Self; 3] = [
        Self::NaiveBayes,
        Self::HoeffdingAdaptiveTree,
        Self::AccuracyUpdatedEnsemble,
    ];

    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.name() == value)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "NaiveBayes",
            Self::HoeffdingAdaptiveTree => "HoeffdingAdaptiveTree",
            Self::AccuracyUpdatedEnsemble => "AccuracyUpdatedEnsemble",
        }
    }

    /// Class path relative to `moa.classifiers`.
    pub fn class_path(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "drift.SingleClassifierDrift",
            Self::HoeffdingAdaptiveTree => "trees.HoeffdingAdaptiveTree",
            Self::AccuracyUpdatedEnsemble => "meta.AccuracyUpdatedEnsemble",
        }
    }

    pub fn accepted_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::name).collect()
    }
}

impl fmt::Display for BaseLearnerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Labelling budget, forwarded to the engine exactly as the user typed it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Budget(String);

impl Budget {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
