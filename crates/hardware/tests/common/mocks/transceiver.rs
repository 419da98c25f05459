use mockall::mock;
use std::fmt;
use wbsoc_core::soc::devices::{RxFrame, Transceiver};

mock! {
    pub Phy {
        pub fn try_receive(&mut self) -> Option<RxFrame>;
        pub fn try_transmit(&mut self, byte: u8) -> bool;
        pub fn set_divisor(&mut self, divisor: u32);
        pub fn tick(&mut self);
    }
}

/// A transceiver forwarding every handshake to a `MockPhy`.
pub struct MockTransceiver {
    pub mock: MockPhy,
    id: &'static str,
}

impl MockTransceiver {
    pub fn new(mock: MockPhy, id: &'static str) -> Self {
        Self { mock, id }
    }

    /// A mock that accepts any divisor and any number of ticks.
    pub fn permissive() -> MockPhy {
        let mut mock = MockPhy::new();
        mock.expect_set_divisor().return_const(());
        mock.expect_tick().return_const(());
        mock
    }
}

impl fmt::Debug for MockTransceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransceiver")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Transceiver for MockTransceiver {
    fn id(&self) -> &str {
        self.id
    }

    fn try_receive(&mut self) -> Option<RxFrame> {
        self.mock.try_receive()
    }

    fn try_transmit(&mut self, byte: u8) -> bool {
        self.mock.try_transmit(byte)
    }

    fn set_divisor(&mut self, divisor: u32) {
        self.mock.set_divisor(divisor);
    }

    fn tick(&mut self) {
        self.mock.tick();
    }
}
