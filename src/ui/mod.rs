/// Presentation: the pure renderer and the interactive terminal driver.

pub mod play;
pub mod renderer;
