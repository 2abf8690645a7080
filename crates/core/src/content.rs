//! Hardcoded authored content: one showcase cave exercising every drawing
//! primitive. Used by the CLI tools and the integration tests.

use crate::cave::object::{CaveObject, MazeFlavor, MazeObject, ObjectKind, RandomFillObject};
use crate::cave::stored::CaveStored;
use crate::types::{Coord, Element};

pub fn showcase_cave() -> CaveStored {
    let mut cave = CaveStored::new("Showcase");
    cave.base.initial_fill = Element::Dirt;
    cave.base.initial_border = Element::SteelWall;
    cave.base.random_fill = [Element::Stone, Element::Diamond, Element::Space, Element::Space];
    cave.base.random_fill_probability = [70, 90, 0, 0];
    cave.base.level_random_seed = [10, 11, 12, 13, 14];
    cave.base.level_diamonds_needed = [12, 14, 16, 18, 20];

    // A walled room with its own floor.
    cave.add_object(CaveObject::new(ObjectKind::FilledRectangle {
        start: Coord::new(2, 2),
        end: Coord::new(12, 8),
        border: Element::BrickWall,
        fill: Element::Space,
    }));
    // A stone ridge across the lower half.
    cave.add_object(CaveObject::new(ObjectKind::Line {
        start: Coord::new(2, 12),
        end: Coord::new(20, 16),
        element: Element::Stone,
    }));
    // A diamond field on a raster.
    cave.add_object(CaveObject::new(ObjectKind::Raster {
        start: Coord::new(24, 2),
        end: Coord::new(37, 10),
        step: Coord::new(3, 2),
        element: Element::Diamond,
    }));
    // A maze in the lower right corner.
    cave.add_object(CaveObject::new(ObjectKind::Maze(MazeObject {
        start: Coord::new(22, 12),
        end: Coord::new(38, 20),
        wall_width: 1,
        path_width: 1,
        wall: Element::BrickWall,
        path: Element::Space,
        horiz_percent: 30,
        seeds: [-1; 5],
        flavor: MazeFlavor::Perfect,
    })));
    // Scattered boulders in the dirt below the room.
    cave.add_object(CaveObject::new(ObjectKind::RandomFill(RandomFillObject {
        start: Coord::new(3, 17),
        end: Coord::new(14, 20),
        replace_only: Some(Element::Dirt),
        seeds: [21, 22, 23, 24, 25],
        initial: Element::Dirt,
        fill: [Element::Stone, Element::Space, Element::Space, Element::Space],
        probability: [50, 0, 0, 0],
        c64_random: true,
    })));
    // Every raster diamond sits on empty space.
    cave.add_object(CaveObject::new(ObjectKind::Join {
        search: Element::Diamond,
        put: Element::Space,
        offset: Coord::new(0, 1),
        backwards: false,
    }));
    cave.add_object(CaveObject::new(ObjectKind::Point {
        start: Coord::new(3, 3),
        element: Element::Inbox,
    }));
    cave.add_object(CaveObject::new(ObjectKind::Point {
        start: Coord::new(38, 1),
        element: Element::Outbox,
    }));

    cave
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cave::rendered::CaveRendered;

    #[test]
    fn showcase_cave_renders_with_its_landmarks_in_place() {
        let cave = showcase_cave();
        let rendered = CaveRendered::new(&cave, 0, 1);
        assert_eq!(*rendered.map.get(3, 3), Element::Inbox);
        assert_eq!(*rendered.map.get(38, 1), Element::Outbox);
        assert_eq!(*rendered.map.get(0, 0), Element::SteelWall);
        assert_eq!(*rendered.map.get(7, 5), Element::Space);
        assert_eq!(*rendered.map.get(2, 2), Element::BrickWall);
    }

    #[test]
    fn showcase_cave_is_visible_on_every_level() {
        let cave = showcase_cave();
        for object in &cave.objects {
            assert!(object.levels.any());
        }
    }
}
