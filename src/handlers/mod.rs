// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth) → Elevated (JWT auth + superuser gate)

pub mod public;    // Tier 1: /health, /api/v1/users/{register,login}
pub mod protected; // Tier 2: /api/v1/users/self
pub mod elevated;  // Tier 3: /api/v1/admin/*
