use std::fmt;

/// A step taken while simplifying an expression.
///
/// Each step names the rule that was applied. Steps are collected by a
/// [`StepCollector`](crate::symbolic::step_collector::StepCollector) passed to
/// [`simplify_with`](super::simplify_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    // infinity and undefined values
    NanAbsorbs,
    AddInfinity,
    MultiplyInfinity,
    PowerInfinity,
    FunctionOfInfinity,

    // addition
    FlattenAdd,
    AddZero,
    AddNumbers,
    CombineLikeTerms,

    // multiplication
    FlattenMultiply,
    MultiplyZero,
    MultiplyOne,
    MultiplyNumbers,
    CombineLikeFactors,
    DistributeCoefficient,

    // powers
    PowerZero,
    PowerOne,
    PowerOneLeft,
    PowerZeroLeft,
    PowerPower,
    NumericPower,
    DistributePower,
    ExpLog,

    // imaginary unit
    I0,
    I1,
    I2,
    I3,

    // functions
    ExpToPower,
    RootToPower,
    LogBase,
    Log,
    Abs,
    Sign,
    Round,
    Mod,
    Factorial,
    Gamma,
    Hyperbolic,
    EvaluateFloat,

    // trigonometry
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Parity,
    InverseTrig,
    Pythagorean,

    // ordering
    SortTerms,
    SortFactors,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::NanAbsorbs => "an undefined value makes the whole expression undefined",
            Self::AddInfinity => "infinity absorbs finite terms",
            Self::MultiplyInfinity => "infinity absorbs positive factors",
            Self::PowerInfinity => "evaluate a power involving infinity",
            Self::FunctionOfInfinity => "evaluate a function at infinity",
            Self::FlattenAdd => "remove nested parentheses in a sum",
            Self::AddZero => "a + 0 = a",
            Self::AddNumbers => "add numbers",
            Self::CombineLikeTerms => "combine like terms",
            Self::FlattenMultiply => "remove nested parentheses in a product",
            Self::MultiplyZero => "a * 0 = 0",
            Self::MultiplyOne => "a * 1 = a",
            Self::MultiplyNumbers => "multiply numbers",
            Self::CombineLikeFactors => "a^m * a^n = a^(m+n)",
            Self::DistributeCoefficient => "distribute a number over a sum",
            Self::PowerZero => "a^0 = 1",
            Self::PowerOne => "a^1 = a",
            Self::PowerOneLeft => "1^a = 1",
            Self::PowerZeroLeft => "0^a = 0",
            Self::PowerPower => "(a^m)^n = a^(m*n)",
            Self::NumericPower => "evaluate a power of numbers",
            Self::DistributePower => "(a*b)^n = a^n * b^n",
            Self::ExpLog => "e^log(a) = a",
            Self::I0 => "i^(4n) = 1",
            Self::I1 => "i^(4n+1) = i",
            Self::I2 => "i^(4n+2) = -1",
            Self::I3 => "i^(4n+3) = -i",
            Self::ExpToPower => "exp(a) = e^a",
            Self::RootToPower => "write a root as a power",
            Self::LogBase => "log(a, b) = log(a) / log(b)",
            Self::Log => "evaluate a logarithm",
            Self::Abs => "evaluate an absolute value",
            Self::Sign => "evaluate a sign",
            Self::Round => "round a number",
            Self::Mod => "evaluate a remainder",
            Self::Factorial => "evaluate a factorial",
            Self::Gamma => "evaluate the gamma function",
            Self::Hyperbolic => "evaluate a hyperbolic function",
            Self::EvaluateFloat => "evaluate a function of a decimal number",
            Self::Sin => "evaluate sine at a known angle",
            Self::Cos => "evaluate cosine at a known angle",
            Self::Tan => "evaluate tangent at a known angle",
            Self::Cot => "evaluate cotangent at a known angle",
            Self::Sec => "evaluate secant at a known angle",
            Self::Csc => "evaluate cosecant at a known angle",
            Self::Parity => "use the symmetry of an odd or even function",
            Self::InverseTrig => "evaluate an inverse trigonometric function",
            Self::Pythagorean => "use the identity sin^2(x) + cos^2(x) = 1",
            Self::SortTerms => "reorder terms",
            Self::SortFactors => "reorder factors",
        };
        write!(f, "{}", description)
    }
}
