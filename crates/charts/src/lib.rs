//! Chart geometry: bubble map placement and line chart layout on a
//! normalized plane. Output is plain numbers; drawing is left to the caller.

pub mod bubble;
pub mod coordinates;
pub mod line;
pub mod palette;

pub use bubble::{layout_bubbles, Bubble, BubbleMap, Placement};
pub use coordinates::{CoordinateTable, PlaneCoordinate};
pub use line::{layout_line, ChartPoint, LineChart, PathCommand};
