//! Single-slot pointer mailbox between the input thread and the frame loop.
//!
//! Writers overwrite the latest sample; the frame loop reads whatever is
//! newest when it draws. Intermediate moves between two frames are coalesced.

use tokio::sync::watch;

use crate::geometry::Point;

/// Latest pointer position in radar canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    /// Pointer is currently over the capture surface.
    pub active: bool,
}

impl PointerSample {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            active: true,
        }
    }
}

/// Write half, owned by the input side.
#[derive(Debug, Clone)]
pub struct PointerWriter {
    sender: watch::Sender<PointerSample>,
}

impl PointerWriter {
    pub fn moved(&self, position: Point) {
        self.sender.send_replace(PointerSample::at(position));
    }

    /// Pointer left the capture surface. The last position is kept but
    /// marked inactive.
    pub fn left(&self) {
        self.sender.send_if_modified(|sample| {
            let was_active = sample.active;
            sample.active = false;
            was_active
        });
    }
}

/// Read half, owned by the frame loop.
#[derive(Debug, Clone)]
pub struct PointerReader {
    receiver: watch::Receiver<PointerSample>,
}

impl PointerReader {
    pub fn latest(&self) -> PointerSample {
        *self.receiver.borrow()
    }
}

pub fn mailbox() -> (PointerWriter, PointerReader) {
    let (sender, receiver) = watch::channel(PointerSample::default());
    (PointerWriter { sender }, PointerReader { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        let (_writer, reader) = mailbox();
        assert!(!reader.latest().active);
    }

    #[test]
    fn reader_sees_only_latest_move() {
        let (writer, reader) = mailbox();
        writer.moved(Point::new(1.0, 1.0));
        writer.moved(Point::new(2.0, 2.0));
        writer.moved(Point::new(3.0, 4.0));

        assert_eq!(reader.latest(), PointerSample::at(Point::new(3.0, 4.0)));
    }

    #[test]
    fn leaving_deactivates_but_keeps_position() {
        let (writer, reader) = mailbox();
        writer.moved(Point::new(5.0, 6.0));
        writer.left();

        let sample = reader.latest();
        assert!(!sample.active);
        assert_eq!(sample.position, Point::new(5.0, 6.0));
    }

    #[test]
    fn writes_from_another_thread_are_visible() {
        let (writer, reader) = mailbox();
        let handle = std::thread::spawn(move || writer.moved(Point::new(7.0, 8.0)));
        handle.join().unwrap();

        // Writer is gone; the last sample survives.
        assert_eq!(reader.latest(), PointerSample::at(Point::new(7.0, 8.0)));
    }
}
