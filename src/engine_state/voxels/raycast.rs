//! # Grid March
//!
//! Walks a ray through the block grid one cell boundary at a time and reports
//! the first cell whose block stops it. Water, lava and empty cells let the
//! ray through. The cell containing the origin is not tested.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::error::TerrainError;

use super::block::block_type::BlockType;

/// The first solid cell along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// World coordinate of the hit cell.
    pub cell: Point3<i32>,
    /// Distance travelled along the ray to the entry face.
    pub distance: f32,
    /// Outward normal of the face the ray entered through.
    pub normal: Vector3<i32>,
    /// Block type of the hit cell.
    pub block: BlockType,
}

impl RayHit {
    /// The empty-side cell in front of the entry face, where a placed block goes.
    pub fn adjacent_cell(&self) -> Point3<i32> {
        self.cell + self.normal
    }
}

/// Marches a ray from `origin` along `direction` for at most `|direction|` units.
///
/// `blocks` returns the block at a world cell.
///
/// # Returns
/// - `Ok(Some(hit))` for the first cell whose block is not transparent
/// - `Ok(None)` if the ray ends first, or `direction` has zero length
/// - `Err(TerrainError::DegenerateRay)` if the direction is not finite
pub fn grid_march(
    blocks: impl Fn(i32, i32, i32) -> BlockType,
    origin: Point3<f32>,
    direction: Vector3<f32>,
) -> Result<Option<RayHit>, TerrainError> {
    let max_len = direction.magnitude();
    if max_len == 0.0 {
        return Ok(None);
    }
    if !max_len.is_finite() {
        return Err(TerrainError::DegenerateRay);
    }

    let dir: [f32; 3] = (direction / max_len).into();
    let start: [f32; 3] = origin.into();
    let mut cell = start.map(|c| c.floor() as i32);

    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        if dir[axis] > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / dir[axis];
            t_max[axis] = (cell[axis] as f32 + 1.0 - start[axis]) / dir[axis];
        } else if dir[axis] < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / dir[axis];
            t_max[axis] = (start[axis] - cell[axis] as f32) / -dir[axis];
        }
    }

    loop {
        let mut crossing: Option<usize> = None;
        for axis in 0..3 {
            if t_max[axis].is_finite() && crossing.map_or(true, |best| t_max[axis] < t_max[best]) {
                crossing = Some(axis);
            }
        }
        let axis = crossing.ok_or(TerrainError::DegenerateRay)?;

        let distance = t_max[axis];
        if distance > max_len {
            return Ok(None);
        }
        cell[axis] = cell[axis].saturating_add(step[axis]);
        t_max[axis] += t_delta[axis];

        let block = blocks(cell[0], cell[1], cell[2]);
        if block.is_solid() {
            let mut normal = Vector3::new(0, 0, 0);
            normal[axis] = -step[axis];
            return Ok(Some(RayHit {
                cell: Point3::from(cell),
                distance,
                normal,
                block,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(cells: &[((i32, i32, i32), BlockType)]) -> impl Fn(i32, i32, i32) -> BlockType + '_ {
        move |x, y, z| {
            cells
                .iter()
                .find(|(pos, _)| *pos == (x, y, z))
                .map_or(BlockType::EMPTY, |(_, block)| *block)
        }
    }

    #[test]
    fn downward_ray_hits_the_top_face() {
        let cells = [((5, 10, 5), BlockType::STONE)];
        let hit = grid_march(world(&cells), Point3::new(5.5, 20.5, 5.5), Vector3::new(0.0, -20.0, 0.0))
            .unwrap()
            .expect("ray should hit");
        assert_eq!(hit.cell, Point3::new(5, 10, 5));
        assert_eq!(hit.normal, Vector3::new(0, 1, 0));
        assert!((hit.distance - 9.5).abs() < 1e-4, "distance {}", hit.distance);
        assert_eq!(hit.adjacent_cell(), Point3::new(5, 11, 5));
    }

    #[test]
    fn short_ray_stops_before_the_block() {
        let cells = [((5, 10, 5), BlockType::STONE)];
        let miss = grid_march(world(&cells), Point3::new(5.5, 20.5, 5.5), Vector3::new(0.0, -5.0, 0.0));
        assert_eq!(miss, Ok(None));
    }

    #[test]
    fn rays_pass_through_water_and_negative_coordinates() {
        let cells = [
            ((-3, 0, -1), BlockType::WATER),
            ((-5, 0, -1), BlockType::DIRT),
        ];
        let hit = grid_march(world(&cells), Point3::new(-0.5, 0.5, -0.5), Vector3::new(-10.0, 0.0, 0.0))
            .unwrap()
            .expect("ray should hit dirt behind water");
        assert_eq!(hit.cell, Point3::new(-5, 0, -1));
        assert_eq!(hit.block, BlockType::DIRT);
        assert_eq!(hit.normal, Vector3::new(1, 0, 0));
        assert!((hit.distance - 3.5).abs() < 1e-4, "distance {}", hit.distance);
    }

    #[test]
    fn diagonal_ray_visits_cells_in_order() {
        let cells = [((2, 1, 0), BlockType::STONE)];
        let hit = grid_march(world(&cells), Point3::new(0.5, 0.25, 0.5), Vector3::new(3.0, 1.5, 0.0))
            .unwrap()
            .expect("diagonal should reach (2, 1, 0)");
        assert_eq!(hit.cell, Point3::new(2, 1, 0));
    }

    #[test]
    fn degenerate_directions() {
        let empty = |_: i32, _: i32, _: i32| BlockType::EMPTY;
        assert_eq!(grid_march(empty, Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0)), Ok(None));
        assert_eq!(
            grid_march(empty, Point3::new(0.0, 0.0, 0.0), Vector3::new(f32::NAN, 1.0, 0.0)),
            Err(TerrainError::DegenerateRay)
        );
    }
}
