pub mod blender;
pub mod matchup;
