pub mod candidate;
pub mod probe;
pub mod scanner;
pub mod selector;

pub use candidate::{parse_java_version, RuntimeCandidate, RuntimeVersion};
pub use probe::{FileProbe, SystemFileProbe};
pub use scanner::{JavaScanner, RuntimeEnumerator};
pub use selector::{rank_candidates, ResolvedRuntime, RuntimeSelector, RuntimeSource, RuntimeSources};
