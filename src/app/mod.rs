// Application layer: one use case per file, orchestrating the domain
// through the ports. No transport or storage details here.

pub mod use_cases;
