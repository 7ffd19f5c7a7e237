// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Duration formatting for the player and track lists.

/// Formats a position in seconds as `MM:SS`, used for the elapsed and
/// remaining time in the player bar.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3600), "60:00");
/// ```
pub(crate) fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats a track duration given in milliseconds as `m:ss`, truncating
/// partial seconds.
pub(crate) fn format_duration_ms(duration_ms: u64) -> String {
    let total_seconds = duration_ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Fraction of a track played, in `0.0..=1.0`.
///
/// The position comes from the player in seconds and the duration from the
/// library in milliseconds. An unknown (zero) duration gives `0.0`.
pub(crate) fn progress_ratio(current_time: f64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }
    (current_time * 1000.0 / duration_ms as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_positions() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn formats_track_durations() {
        assert_eq!(format_duration_ms(0), "0:00");
        assert_eq!(format_duration_ms(61_999), "1:01");
        assert_eq!(format_duration_ms(225_000), "3:45");
        assert_eq!(format_duration_ms(3_600_000), "60:00");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_ratio(30.0, 60_000), 0.5);
        assert_eq!(progress_ratio(90.0, 60_000), 1.0);
        assert_eq!(progress_ratio(-1.0, 60_000), 0.0);
        assert_eq!(progress_ratio(10.0, 0), 0.0);
    }
}
