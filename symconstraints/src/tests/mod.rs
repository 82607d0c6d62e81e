
// Algebra tests
mod isolate;
mod sign;
mod simplify;
mod solve;

// Constraint tests
mod normalize;
mod symbols;

// Evaluator tests
mod evaluator;
