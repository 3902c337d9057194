//! Usage: Notification surface geometry (fixed size, top-right anchored).

pub(crate) const NOTIFICATION_WIDTH: f64 = 350.0;
pub(crate) const NOTIFICATION_HEIGHT: f64 = 200.0;
const NOTIFICATION_RIGHT_OFFSET: f64 = 370.0;
const NOTIFICATION_TOP_OFFSET: f64 = 20.0;

/// Logical work area of the primary display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WorkArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl WorkArea {
    /// From the monitor's physical work area (taskbar / menu bar already excluded).
    pub(crate) fn from_physical(x: i32, y: i32, width: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            x: f64::from(x) / scale,
            y: f64::from(y) / scale,
            width: f64::from(width) / scale,
        }
    }
}

/// Logical `(x, y)` of the notification surface: `(width - 370, 20)` relative to the work area.
pub(crate) fn notification_position(area: WorkArea) -> (f64, f64) {
    let x = (area.width - NOTIFICATION_RIGHT_OFFSET).max(0.0);
    (area.x + x, area.y + NOTIFICATION_TOP_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_top_right_of_primary_display() {
        let area = WorkArea {
            x: 0.0,
            y: 0.0,
            width: 1920.0,
        };
        assert_eq!(notification_position(area), (1550.0, 20.0));
    }

    #[test]
    fn follows_work_area_origin() {
        let area = WorkArea {
            x: 100.0,
            y: 30.0,
            width: 1280.0,
        };
        assert_eq!(notification_position(area), (1010.0, 50.0));
    }

    #[test]
    fn menu_bar_offset_survives_hidpi_conversion() {
        // 2x display, 25pt menu bar at the top: work area starts at physical y=50.
        let area = WorkArea::from_physical(0, 50, 2880, 2.0);
        assert_eq!(area, WorkArea { x: 0.0, y: 25.0, width: 1440.0 });
        assert_eq!(notification_position(area), (1070.0, 45.0));
    }

    #[test]
    fn zero_scale_factor_is_treated_as_one() {
        let area = WorkArea::from_physical(10, 40, 1920, 0.0);
        assert_eq!(area, WorkArea { x: 10.0, y: 40.0, width: 1920.0 });
    }

    #[test]
    fn narrow_screen_clamps_to_left_edge() {
        let area = WorkArea {
            x: 0.0,
            y: 0.0,
            width: 300.0,
        };
        assert_eq!(notification_position(area), (0.0, 20.0));
    }
}
