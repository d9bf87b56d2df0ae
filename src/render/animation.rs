//! Sprite-sheet animation timing tables.
//!
//! Every character animates from one sprite sheet laid out as a grid. An
//! [`Animation`] names a run of frames inside that grid (a row, a starting
//! column and a frame count) together with its timing. The per-character
//! tables below are fixed data; the game looks them up by [`AnimationState`].

use fxhash::FxHashMap;
use glam::{Vec2, vec2};

/// What a character is currently doing, as far as its sprite is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    MovingLeft,
    MovingRight,
    MovingUp,
    MovingDown,
    MovingUpLeft,
    MovingUpRight,
    MovingDownLeft,
    MovingDownRight,
    Sitting,
    Sleeping,
    LayingDown,
    OnTwoFeet,
    Idle,
}

/// A run of frames inside a sprite sheet grid, plus its frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frame_count: u32,
    pub current_frame: u32,
    pub frame_duration_ms: f32,
    pub elapsed_ms: f32,
    pub sheet_cols: u32,
    pub sheet_rows: u32,
    pub row: u32,
    pub start_col: u32,
}

impl Animation {
    pub const fn new(
        frame_count: u32,
        frame_duration_ms: f32,
        sheet_cols: u32,
        sheet_rows: u32,
        row: u32,
        start_col: u32,
    ) -> Self {
        Animation {
            frame_count,
            current_frame: 0,
            frame_duration_ms,
            elapsed_ms: 0.0,
            sheet_cols,
            sheet_rows,
            row,
            start_col,
        }
    }

    /// Steps the frame clock by `dt_ms` milliseconds, wrapping around the
    /// frame run. Single-frame and zero-duration animations never advance.
    pub fn advance(&mut self, dt_ms: f32) {
        if self.frame_count <= 1 || self.frame_duration_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += dt_ms;
        while self.elapsed_ms >= self.frame_duration_ms {
            self.elapsed_ms -= self.frame_duration_ms;
            self.current_frame = (self.current_frame + 1) % self.frame_count;
        }
    }

    /// Rewinds to the first frame.
    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.elapsed_ms = 0.0;
    }

    /// The current frame's rectangle in normalized sheet coordinates,
    /// top-left origin, returned as (min, max).
    pub fn uv_rect(&self) -> (Vec2, Vec2) {
        let col = self.start_col + self.current_frame;
        let frame = vec2(
            1.0 / self.sheet_cols as f32,
            1.0 / self.sheet_rows as f32,
        );
        let min = vec2(col as f32 * frame.x, self.row as f32 * frame.y);
        (min, min + frame)
    }
}

/// The cat animates from a 24x17 sheet, one row per movement direction.
pub fn cat_animations() -> FxHashMap<AnimationState, Animation> {
    FxHashMap::from_iter([
        (AnimationState::MovingLeft, Animation::new(4, 100.0, 24, 17, 5, 12)),
        (AnimationState::MovingRight, Animation::new(4, 100.0, 24, 17, 13, 12)),
        (AnimationState::MovingUp, Animation::new(4, 100.0, 24, 17, 1, 12)),
        (AnimationState::MovingDown, Animation::new(4, 100.0, 24, 17, 9, 12)),
        (AnimationState::MovingUpLeft, Animation::new(4, 100.0, 24, 17, 3, 12)),
        (AnimationState::MovingUpRight, Animation::new(4, 100.0, 24, 17, 15, 12)),
        (AnimationState::MovingDownLeft, Animation::new(4, 100.0, 24, 17, 7, 12)),
        (AnimationState::MovingDownRight, Animation::new(4, 100.0, 24, 17, 11, 12)),
        (AnimationState::Idle, Animation::new(1, 0.0, 24, 17, 1, 6)),
    ])
}

/// The villager sheet is a 3x4 grid, one row per facing.
pub fn villager_animations() -> FxHashMap<AnimationState, Animation> {
    FxHashMap::from_iter([
        (AnimationState::MovingLeft, Animation::new(3, 150.0, 3, 4, 1, 0)),
        (AnimationState::MovingRight, Animation::new(3, 150.0, 3, 4, 2, 0)),
        (AnimationState::MovingUp, Animation::new(3, 150.0, 3, 4, 3, 0)),
        (AnimationState::MovingDown, Animation::new(3, 150.0, 3, 4, 0, 0)),
        (AnimationState::Idle, Animation::new(1, 0.0, 3, 4, 0, 1)),
    ])
}

/// The dog sheet is an 8x9 grid with a row per behavior.
pub fn dog_animations() -> FxHashMap<AnimationState, Animation> {
    FxHashMap::from_iter([
        (AnimationState::MovingLeft, Animation::new(8, 300.0, 8, 9, 3, 0)),
        (AnimationState::Sitting, Animation::new(8, 300.0, 8, 9, 1, 0)),
        (AnimationState::Sleeping, Animation::new(4, 200.0, 8, 9, 8, 0)),
        (AnimationState::LayingDown, Animation::new(8, 300.0, 8, 9, 2, 0)),
        (AnimationState::OnTwoFeet, Animation::new(8, 300.0, 8, 9, 7, 0)),
        (AnimationState::Idle, Animation::new(1, 0.0, 8, 9, 1, 1)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tables() -> Vec<(&'static str, FxHashMap<AnimationState, Animation>)> {
        vec![
            ("cat", cat_animations()),
            ("villager", villager_animations()),
            ("dog", dog_animations()),
        ]
    }

    #[test]
    fn every_animation_fits_inside_its_sheet() {
        for (name, table) in all_tables() {
            for (state, anim) in &table {
                assert!(anim.frame_count >= 1, "{name} {state:?} has no frames");
                assert!(
                    anim.row < anim.sheet_rows,
                    "{name} {state:?} row outside sheet"
                );
                assert!(
                    anim.start_col + anim.frame_count <= anim.sheet_cols,
                    "{name} {state:?} frame run outside sheet"
                );
            }
        }
    }

    #[test]
    fn every_table_has_an_idle_entry() {
        for (name, table) in all_tables() {
            let idle = table
                .get(&AnimationState::Idle)
                .unwrap_or_else(|| panic!("{name} has no idle"));
            assert_eq!(idle.frame_count, 1);
        }
    }

    #[test]
    fn idle_never_advances() {
        let mut idle = cat_animations()[&AnimationState::Idle];
        idle.advance(10_000.0);
        assert_eq!(idle.current_frame, 0);
    }

    #[test]
    fn advance_steps_and_wraps() {
        let mut anim = cat_animations()[&AnimationState::MovingLeft];
        assert_eq!(anim.current_frame, 0);

        anim.advance(100.0);
        assert_eq!(anim.current_frame, 1);

        // Four full frames at 100ms each wraps back around.
        anim.advance(400.0);
        assert_eq!(anim.current_frame, 1);

        // Leftover time carries into the next frame.
        anim.advance(50.0);
        assert_eq!(anim.current_frame, 1);
        anim.advance(50.0);
        assert_eq!(anim.current_frame, 2);
    }

    #[test]
    fn reset_rewinds_the_clock() {
        let mut anim = dog_animations()[&AnimationState::Sleeping];
        anim.advance(450.0);
        assert_ne!(anim.current_frame, 0);
        anim.reset();
        assert_eq!(anim.current_frame, 0);
        assert_eq!(anim.elapsed_ms, 0.0);
    }

    #[test]
    fn uv_rects_stay_in_the_unit_square() {
        for (name, table) in all_tables() {
            for (state, anim) in &table {
                let mut anim = *anim;
                for _ in 0..anim.frame_count {
                    let (min, max) = anim.uv_rect();
                    for v in [min.x, min.y, max.x, max.y] {
                        assert!(
                            (0.0..=1.0).contains(&v),
                            "{name} {state:?} uv out of range: {v}"
                        );
                    }
                    assert!(min.x < max.x && min.y < max.y);
                    anim.current_frame = (anim.current_frame + 1) % anim.frame_count;
                }
            }
        }
    }

    #[test]
    fn uv_rect_moves_one_column_per_frame() {
        let mut anim = cat_animations()[&AnimationState::MovingDown];
        let (first, _) = anim.uv_rect();
        anim.advance(100.0);
        let (second, _) = anim.uv_rect();
        assert!((second.x - first.x - 1.0 / 24.0).abs() < 1e-6);
        assert_eq!(first.y, second.y);
    }
}
