//! # Voxel Tasks
//!
//! Background work on block data. Zone fills are the only task here; they
//! run on the task manager's workers so generation never stalls a tick.

pub mod chunk_generation_task;
