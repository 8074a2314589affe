#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use ledmux::{FlexPin, MatchTimer, PwmCompare, PwmMode};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A physical line of the simulated board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Col(usize),
    LedRow(usize),
}

/// Everything the drivers do to the board, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Input(Line),
    Output(Line),
    High(Line),
    Low(Line),
    Read(Line, bool),
    ClockOn,
    Channels(u32),
    Mode(u32, PwmMode),
    Outputs(u32),
    Compare(u8, u8),
    Period(u16),
    Prescaler(u8),
    ResetCounter,
    Start,
    Irq(u8),
    ClearMatch,
    ClearAll,
}

/// Simulated key matrix.
///
/// Every line idles as an input with a pull-up. An input reads low when a pressed
/// key connects it to a line which is driven low.
#[derive(Default)]
pub struct Board {
    outputs: HashSet<Line>,
    low: HashSet<Line>,
    pressed: HashSet<(usize, usize)>,
    pub log: Vec<Event>,
}

pub type SharedBoard = Rc<RefCell<Board>>;

pub fn board() -> SharedBoard {
    Rc::new(RefCell::new(Board::default()))
}

impl Board {
    pub fn press(&mut self, row: usize, col: usize) {
        self.pressed.insert((row, col));
    }

    pub fn release(&mut self, row: usize, col: usize) {
        self.pressed.remove(&(row, col));
    }

    pub fn is_output(&self, line: Line) -> bool {
        self.outputs.contains(&line)
    }

    pub fn is_driven_low(&self, line: Line) -> bool {
        self.outputs.contains(&line) && self.low.contains(&line)
    }

    /// Output level latch of a line
    pub fn is_latched_low(&self, line: Line) -> bool {
        self.low.contains(&line)
    }

    pub fn level(&self, line: Line) -> bool {
        if self.outputs.contains(&line) {
            return !self.low.contains(&line);
        }
        let pulled_low = match line {
            Line::Row(r) => self
                .pressed
                .iter()
                .any(|&(row, col)| row == r && self.is_driven_low(Line::Col(col))),
            Line::Col(c) => self
                .pressed
                .iter()
                .any(|&(row, col)| col == c && self.is_driven_low(Line::Row(row))),
            Line::LedRow(_) => false,
        };
        !pulled_low
    }

    pub fn take_log(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }
}

pub struct FakePin {
    board: SharedBoard,
    line: Line,
}

impl FakePin {
    pub fn new(board: &SharedBoard, line: Line, output: bool) -> Self {
        if output {
            board.borrow_mut().outputs.insert(line);
        }
        Self {
            board: board.clone(),
            line,
        }
    }
}

/// `N` pins of the same kind
pub fn pins<const N: usize>(board: &SharedBoard, kind: fn(usize) -> Line, output: bool) -> [FakePin; N] {
    core::array::from_fn(|i| FakePin::new(board, kind(i), output))
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut board = self.board.borrow_mut();
        let level = board.level(self.line);
        board.log.push(Event::Read(self.line, level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.borrow_mut();
        board.low.insert(self.line);
        board.log.push(Event::Low(self.line));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.borrow_mut();
        board.low.remove(&self.line);
        board.log.push(Event::High(self.line));
        Ok(())
    }
}

impl FlexPin for FakePin {
    fn set_as_input(&mut self) {
        let mut board = self.board.borrow_mut();
        board.outputs.remove(&self.line);
        board.log.push(Event::Input(self.line));
    }

    fn set_as_output(&mut self) {
        let mut board = self.board.borrow_mut();
        board.outputs.insert(self.line);
        board.log.push(Event::Output(self.line));
    }
}

/// Timer which records register writes into the board log
pub struct FakeTimer {
    board: SharedBoard,
}

impl FakeTimer {
    pub fn new(board: &SharedBoard) -> Self {
        Self { board: board.clone() }
    }

    fn push(&mut self, event: Event) {
        self.board.borrow_mut().log.push(event);
    }
}

impl MatchTimer for FakeTimer {
    fn enable_clock(&mut self) {
        self.push(Event::ClockOn);
    }

    fn set_prescaler(&mut self, prescaler: u8) {
        self.push(Event::Prescaler(prescaler));
    }

    fn set_match_period(&mut self, period: u16) {
        self.push(Event::Period(period));
    }

    fn reset_counter(&mut self) {
        self.push(Event::ResetCounter);
    }

    fn start(&mut self) {
        self.push(Event::Start);
    }

    fn enable_interrupt(&mut self, priority: u8) {
        self.push(Event::Irq(priority));
    }

    fn clear_match_interrupt(&mut self) {
        self.push(Event::ClearMatch);
    }

    fn clear_all_interrupts(&mut self) {
        self.push(Event::ClearAll);
    }
}

impl PwmCompare for FakeTimer {
    fn enable_channels(&mut self, channels: u32) {
        self.push(Event::Channels(channels));
    }

    fn set_mode(&mut self, channels: u32, mode: PwmMode) {
        self.push(Event::Mode(channels, mode));
    }

    fn set_compare(&mut self, channel: u8, value: u8) {
        self.push(Event::Compare(channel, value));
    }

    fn set_outputs(&mut self, channels: u32) {
        self.push(Event::Outputs(channels));
    }
}

/// Compare writes of a log, in order
pub fn compares(log: &[Event]) -> Vec<(u8, u8)> {
    log.iter()
        .filter_map(|e| match e {
            Event::Compare(channel, value) => Some((*channel, *value)),
            _ => None,
        })
        .collect()
}
