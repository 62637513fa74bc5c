//! MOS 6526 Complex Interface Adapter.
//!
//! The C64 carries two instances. CIA1's IRQ output feeds the CPU IRQ line
//! and its port A/B pins form the 8x8 keyboard matrix; CIA2's IRQ output
//! feeds NMI and its port A low bits select the VIC-II's 16K bank.

/// One of the two 16-bit timers (A or B). Counts down on phi2 (or, for timer
/// B, optionally on timer A underflows); reload and one-shot/continuous
/// behavior are controlled by the owning CIA's control register.
#[derive(Debug, Clone, Copy, Default)]
struct Timer {
    counter: u16,
    latch: u16,
    cr: u8,
    /// Cycles remaining before START takes effect. A write to CR with the
    /// START bit newly set does not make the timer count on that same tick.
    start_delay: u8,
    started: bool,
}

impl Timer {
    const RUNMODE_ONE_SHOT: u8 = 0x08;

    fn one_shot(&self) -> bool {
        self.cr & Self::RUNMODE_ONE_SHOT != 0
    }

    fn write_cr(&mut self, data: u8) {
        let was_started = self.cr & 0x01 != 0;
        let now_started = data & 0x01 != 0;
        self.cr = data & !0x10; // LOAD is a strobe, never retained in the stored CR
        if data & 0x10 != 0 {
            self.counter = self.latch;
        }
        if now_started && !was_started {
            self.start_delay = CIA_START_DELAY;
            self.started = false;
        } else if !now_started {
            self.started = false;
            self.start_delay = 0;
        }
    }

    fn write_lo(&mut self, data: u8) {
        self.latch = (self.latch & 0xFF00) | data as u16;
    }

    fn write_hi(&mut self, data: u8) {
        self.latch = (self.latch & 0x00FF) | ((data as u16) << 8);
        if !self.started && self.start_delay == 0 {
            self.counter = self.latch;
        }
    }

    fn read_lo(&self) -> u8 {
        self.counter as u8
    }

    fn read_hi(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    /// Advance one phi2 cycle. `count_enable` reflects the selected input
    /// source already gated by the caller (phi2, CNT, or timer-A underflow).
    /// Returns true on underflow.
    fn clock(&mut self, count_enable: bool) -> bool {
        if self.start_delay > 0 {
            self.start_delay -= 1;
            if self.start_delay == 0 {
                self.started = true;
            }
            return false;
        }
        if !self.started || !count_enable {
            return false;
        }
        if self.counter == 0 {
            self.counter = self.latch;
            if self.one_shot() {
                self.started = false;
                self.cr &= !0x01;
            }
            true
        } else {
            self.counter -= 1;
            false
        }
    }
}

/// Chosen start-pipeline delay (see open question in the design ledger).
const CIA_START_DELAY: u8 = 2;

/// BCD time-of-day clock, prescaled from phi2 down to a 10 Hz tick.
#[derive(Debug, Clone, Copy, Default)]
struct Tod {
    tenths: u8,
    sec: u8,
    min: u8,
    hr: u8, // bit 7 = PM
    alarm_tenths: u8,
    alarm_sec: u8,
    alarm_min: u8,
    alarm_hr: u8,
    prescaler: u32,
    /// Divisor for the prescaler: 5 (60Hz input) or 6 (50Hz input), selected
    /// by CRA bit 7, giving a 10Hz tick either way once multiplied by the
    /// ~50/60Hz-per-phi2-divider the real chip derives externally. We model
    /// the externally-supplied line frequency directly in ticks-per-tenth.
    ticks_per_tenth: u32,
    frozen: Option<(u8, u8, u8, u8)>,
    write_alarm: bool,
    running: bool,
}

impl Tod {
    fn new() -> Self {
        Tod {
            ticks_per_tenth: 100_000, // effectively stopped until a real rate is wired in
            running: false,
            ..Default::default()
        }
    }

    fn bump_bcd(value: u8, max_exclusive: u8) -> (u8, bool) {
        let lo = (value & 0x0F) + 1;
        let (lo, carry_lo) = if lo > 9 { (0, true) } else { (lo, false) };
        let mut hi = (value >> 4) & 0x0F;
        if carry_lo {
            hi += 1;
        }
        let result = (hi << 4) | lo;
        if result >= max_exclusive {
            (0, true)
        } else {
            (result, false)
        }
    }

    fn clock(&mut self) {
        if !self.running {
            return;
        }
        self.prescaler += 1;
        if self.prescaler < self.ticks_per_tenth {
            return;
        }
        self.prescaler = 0;

        let (tenths, carry) = Self::bump_bcd(self.tenths, 0x0A);
        self.tenths = tenths;
        if !carry {
            return;
        }
        let (sec, carry) = Self::bump_bcd(self.sec, 0x60);
        self.sec = sec;
        if !carry {
            return;
        }
        let (min, carry) = Self::bump_bcd(self.min, 0x60);
        self.min = min;
        if !carry {
            return;
        }
        let pm = self.hr & 0x80;
        let hour12 = self.hr & 0x7F;
        let (next, wrapped) = Self::bump_bcd(hour12, 0x13);
        let next = if wrapped { 0x01 } else { next };
        // hour 12 -> 1 flips AM/PM
        let flip = hour12 == 0x12;
        self.hr = if flip { next | (pm ^ 0x80) } else { next | pm };
    }

    fn alarm_hit(&self) -> bool {
        self.tenths == self.alarm_tenths
            && self.sec == self.alarm_sec
            && self.min == self.alarm_min
            && self.hr == self.alarm_hr
    }

    /// Reading hours freezes a shadow snapshot of all four bytes.
    fn read_hr(&mut self) -> u8 {
        self.frozen = Some((self.tenths, self.sec, self.min, self.hr));
        self.frozen.unwrap().3
    }

    fn read_min(&self) -> u8 {
        self.frozen.map(|(_, _, m, _)| m).unwrap_or(self.min)
    }

    fn read_sec(&self) -> u8 {
        self.frozen.map(|(_, s, _, _)| s).unwrap_or(self.sec)
    }

    /// Reading tenths releases the freeze.
    fn read_tenths(&mut self) -> u8 {
        let value = self.frozen.map(|(t, ..)| t).unwrap_or(self.tenths);
        self.frozen = None;
        value
    }

    fn write(&mut self, field: u8, data: u8) {
        if self.write_alarm {
            match field {
                0 => self.alarm_tenths = data & 0x0F,
                1 => self.alarm_sec = data & 0x7F,
                2 => self.alarm_min = data & 0x7F,
                3 => self.alarm_hr = data & 0x9F,
                _ => unreachable!(),
            }
        } else {
            match field {
                0 => {
                    self.tenths = data & 0x0F;
                    self.running = true;
                }
                1 => self.sec = data & 0x7F,
                2 => self.min = data & 0x7F,
                3 => {
                    self.hr = data & 0x9F;
                    self.running = false;
                }
                _ => unreachable!(),
            }
        }
    }
}

/// ICR flag bits (bits 0..4 of `icr_data`/`icr_mask`).
pub mod icr_flag {
    pub const TIMER_A: u8 = 0x01;
    pub const TIMER_B: u8 = 0x02;
    pub const TOD_ALARM: u8 = 0x04;
    pub const SERIAL: u8 = 0x08;
    pub const FLAG: u8 = 0x10;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cia6526 {
    pra: u8,
    ddra: u8,
    prb: u8,
    ddrb: u8,
    port_a_input: u8,
    port_b_input: u8,
    ta: Timer,
    tb: Timer,
    tod: Tod,
    sdr: u8,
    icr_data: u8,
    icr_mask: u8,
    irq_raw_prev: bool,
    irq_line: bool,
    flag_prev: bool,
    /// 8x8 keyboard matrix: `pressed[row]` bit `col` set when that key is down.
    /// Only meaningful for the CIA1 instance.
    pressed: [u8; 8],
}

impl Cia6526 {
    pub fn new() -> Self {
        let mut cia = Cia6526 {
            port_a_input: 0xFF,
            port_b_input: 0xFF,
            pressed: [0xFF; 8],
            ..Default::default()
        };
        cia.tod = Tod::new();
        cia
    }

    /// Register offsets 0x0..0xF (mirrored every 0x10 by the caller).
    pub fn read(&mut self, reg: u8) -> u8 {
        match reg & 0x0F {
            0x0 => self.read_pra(),
            0x1 => self.read_prb(),
            0x2 => self.ddra,
            0x3 => self.ddrb,
            0x4 => self.ta.read_lo(),
            0x5 => self.ta.read_hi(),
            0x6 => self.tb.read_lo(),
            0x7 => self.tb.read_hi(),
            0x8 => self.tod.read_tenths(),
            0x9 => self.tod.read_sec(),
            0xA => self.tod.read_min(),
            0xB => self.tod.read_hr(),
            0xC => self.sdr,
            0xD => self.read_icr(),
            0xE => self.ta.cr,
            0xF => self.tb.cr,
            _ => unreachable!(),
        }
    }

    pub fn write(&mut self, reg: u8, data: u8) {
        match reg & 0x0F {
            0x0 => self.pra = data,
            0x1 => self.prb = data,
            0x2 => self.ddra = data,
            0x3 => self.ddrb = data,
            0x4 => self.ta.write_lo(data),
            0x5 => self.ta.write_hi(data),
            0x6 => self.tb.write_lo(data),
            0x7 => self.tb.write_hi(data),
            0x8 => {
                self.tod.write_alarm = self.ta.cr & 0x80 != 0;
                self.tod.write(0, data);
            }
            0x9 => self.tod.write(1, data),
            0xA => self.tod.write(2, data),
            0xB => {
                self.tod.write_alarm = self.tb.cr & 0x80 != 0;
                self.tod.write(3, data);
            }
            0xC => self.sdr = data,
            0xD => self.write_icr_mask(data),
            0xE => self.ta.write_cr(data),
            0xF => self.tb.write_cr(data),
            _ => unreachable!(),
        }
    }

    fn read_pra(&self) -> u8 {
        (self.pra & self.ddra) | (self.port_a_input & !self.ddra)
    }

    /// Port B reads both the externally driven bits and, for CIA1, the
    /// wire-AND keyboard row result gated by whichever columns PRA selects.
    fn read_prb(&self) -> u8 {
        let base = (self.prb & self.ddrb) | (self.port_b_input & !self.ddrb);
        let strobe = self.read_pra();
        let mut rows_low = 0u8;
        for col in 0..8u8 {
            if strobe & (1 << col) == 0 {
                for row in 0..8u8 {
                    if self.pressed[row as usize] & (1 << col) != 0 {
                        rows_low |= 1 << row;
                    }
                }
            }
        }
        base & !rows_low
    }

    fn read_icr(&mut self) -> u8 {
        // bits 5/6 are unused and always read 0; bit 7 carries the deferred IR
        let result = (self.icr_data & 0x1F) | ((self.irq_line as u8) << 7);
        self.icr_data = 0;
        self.irq_line = false;
        self.irq_raw_prev = false;
        result
    }

    fn write_icr_mask(&mut self, data: u8) {
        let bits = data & 0x1F;
        if data & 0x80 != 0 {
            self.icr_mask |= bits;
        } else {
            self.icr_mask &= !bits;
        }
    }

    pub fn set_key(&mut self, row: usize, col: usize, pressed: bool) {
        if pressed {
            self.pressed[row] |= 1 << col;
        } else {
            self.pressed[row] &= !(1 << col);
        }
    }

    pub fn set_port_a_input(&mut self, data: u8) {
        self.port_a_input = data;
    }

    pub fn set_port_b_input(&mut self, data: u8) {
        self.port_b_input = data;
    }

    /// Effective output pins of Port A, for external consumers (e.g. CIA2
    /// port A bits 0..1 selecting the VIC-II bank).
    pub fn output_a(&self) -> u8 {
        self.read_pra()
    }

    /// FLAG pin edge (used by the serial bus on CIA2, byte-ready on CIA1).
    /// `state` is the new level; a falling edge sets the FLAG ICR bit.
    pub fn set_flag(&mut self, state: bool) {
        if !state && self.flag_prev {
            self.icr_data |= icr_flag::FLAG;
        }
        self.flag_prev = state;
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_line
    }

    fn tb_input_mode(&self) -> u8 {
        (self.tb.cr >> 5) & 0x03
    }

    pub fn clock(&mut self) {
        let ta_underflow = self.ta.clock(self.ta.cr & 0x20 == 0);
        let tb_count_enable = match self.tb_input_mode() {
            0 => true,
            1 => false, // CNT pin input, not modeled as externally driven
            2 | 3 => ta_underflow,
            _ => unreachable!(),
        };
        let tb_underflow = self.tb.clock(tb_count_enable);
        self.tod.clock();
        let tod_alarm = self.tod.alarm_hit();

        let mut new_flags = 0u8;
        if ta_underflow {
            new_flags |= icr_flag::TIMER_A;
        }
        if tb_underflow {
            new_flags |= icr_flag::TIMER_B;
        }
        if tod_alarm {
            new_flags |= icr_flag::TOD_ALARM;
        }
        if new_flags != 0 {
            self.icr_data |= new_flags;
        }

        let raw = (self.icr_data & self.icr_mask) != 0;
        self.irq_line = self.irq_raw_prev;
        self.irq_raw_prev = raw;
    }
}
