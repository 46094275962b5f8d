mod model;

pub use model::{
    Goal, GoalId, GoalInterval, NewGoal, ProofType, StatusDescription, UserRegistration,
};
