// Pipelines — analysis plus persistence, for one comment or a whole upload.
//
// submit: one comment -> Analyzer -> one storage transaction.
// bulk:   many rows -> concurrent analysis -> one transaction per row.

pub mod bulk;
pub mod submit;
