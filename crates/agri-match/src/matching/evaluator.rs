use super::domain::FarmerProfile;

/// Capability shared by the weighted engine and the rule-expression evaluator,
/// so both can be driven from the same profile fixtures.
pub trait Evaluator {
    type Subject: ?Sized;
    type Verdict: Verdict;
    type Error: std::error::Error;

    fn evaluate(
        &self,
        subject: &Self::Subject,
        profile: &FarmerProfile,
    ) -> Result<Self::Verdict, Self::Error>;
}

/// Pass/fail view over an evaluator's output.
pub trait Verdict {
    fn passed(&self) -> bool;
}
