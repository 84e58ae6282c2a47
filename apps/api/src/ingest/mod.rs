// Chat export handling: batch import into the relational store, and
// per-user engagement metrics derived from the same snapshot.

pub mod derive;
pub mod slack_export;
