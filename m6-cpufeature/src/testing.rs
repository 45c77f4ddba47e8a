//! Test doubles for the platform traits
//!
//! [`MockPlatform`] simulates a handful of CPUs sharing one synthetic
//! register file. Enable functions from the test tables record each call,
//! with the CPU it ran on, in a per-thread log read by [`enable_log`].
//! Parking unwinds instead of looping so tests can observe ejection.
//! Log records are captured per thread as well, see [`capture_logs`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::capability::Capability;
use crate::descriptor::{CpuCapability, EnableFn, has_cpuid_feature, has_id_aa64pfr0_feature};
use crate::platform::{CpuOps, IdRegisterReader};
use crate::sysreg::SysReg;

/// A synthetic register file. Registers never written read as zero.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    values: HashMap<SysReg, u64>,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reg: SysReg, value: u64) -> Self {
        self.values.insert(reg, value);
        self
    }
}

impl IdRegisterReader for Registers {
    fn read_id_register(&self, reg: SysReg) -> u64 {
        self.values.get(&reg).copied().unwrap_or(0)
    }
}

/// One recorded enable call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableCall {
    pub cpu: usize,
    pub enable: &'static str,
    /// `true` when called with a descriptor
    pub primary: bool,
}

impl EnableCall {
    pub fn primary(cpu: usize, enable: &'static str) -> Self {
        Self {
            cpu,
            enable,
            primary: true,
        }
    }

    pub fn refine(cpu: usize, enable: &'static str) -> Self {
        Self {
            cpu,
            enable,
            primary: false,
        }
    }
}

/// Platform-side effects, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    MarkedAbsent(usize),
    CpuDie(usize),
    Parked(usize),
}

/// Panic payload used by [`MockPlatform::park`]
struct Parked;

thread_local! {
    static CURRENT_CPU: Cell<usize> = const { Cell::new(0) };
    static ENABLE_LOG: RefCell<Vec<EnableCall>> = const { RefCell::new(Vec::new()) };
    static LOG_LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records every log line on the thread that emitted it
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = (record.level(), record.args().to_string());
        LOG_LINES.with_borrow_mut(|lines| lines.push(line));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static LOGGER_INIT: Once = Once::new();

/// Install the capturing logger if needed and clear this thread's lines
pub fn capture_logs() {
    LOGGER_INIT.call_once(|| {
        log::set_logger(&LOGGER)
            .map(|()| log::set_max_level(LevelFilter::Trace))
            .ok();
    });
    LOG_LINES.with_borrow_mut(|lines| lines.clear());
}

/// Messages logged at `level` on this thread since the last [`capture_logs`]
pub fn logged(level: Level) -> Vec<String> {
    LOG_LINES.with_borrow(|lines| {
        lines
            .iter()
            .filter(|(at, _)| *at == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}

fn record(enable: &'static str, cap: Option<&CpuCapability>) {
    let call = EnableCall {
        cpu: CURRENT_CPU.get(),
        enable,
        primary: cap.is_some(),
    };
    ENABLE_LOG.with_borrow_mut(|log| log.push(call));
}

fn enable_a(cap: Option<&CpuCapability>) {
    record("A", cap);
}

fn enable_b(cap: Option<&CpuCapability>) {
    record("B", cap);
}

fn enable_c(cap: Option<&CpuCapability>) {
    record("C", cap);
}

/// Enable calls recorded on this thread since the last [`MockPlatform::new`]
pub fn enable_log() -> Vec<EnableCall> {
    ENABLE_LOG.with_borrow(|log| log.clone())
}

static SCENARIO: [CpuCapability; 3] = [
    CpuCapability {
        desc: "A",
        capability: Capability::HasSysregGicCpuif,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Pfr0El1),
        field_pos: 24,
        min_field_value: 1,
        enable: Some(enable_a as EnableFn),
    },
    CpuCapability {
        desc: "B",
        capability: Capability::HasPan,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Mmfr1El1),
        field_pos: 20,
        min_field_value: 1,
        enable: Some(enable_b as EnableFn),
    },
    CpuCapability::END,
];

static BOOT_ONLY: [CpuCapability; 1] = [CpuCapability {
    desc: "C",
    capability: Capability::HasLseAtomics,
    matches: Some(has_id_aa64pfr0_feature),
    sys_reg: None,
    field_pos: 20,
    min_field_value: 2,
    enable: Some(enable_c as EnableFn),
}];

static OUT_OF_BIT_ORDER: [CpuCapability; 4] = [
    CpuCapability {
        desc: "UAO",
        capability: Capability::HasUao,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Mmfr2El1),
        field_pos: 4,
        min_field_value: 1,
        enable: None,
    },
    CpuCapability {
        desc: "PAN",
        capability: Capability::HasPan,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Mmfr1El1),
        field_pos: 20,
        min_field_value: 1,
        enable: None,
    },
    CpuCapability {
        desc: "GIC",
        capability: Capability::HasSysregGicCpuif,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Pfr0El1),
        field_pos: 24,
        min_field_value: 1,
        enable: None,
    },
    CpuCapability::END,
];

/// A: ID_AA64PFR0 field 24 >= 1, B: ID_AA64MMFR1 field 20 >= 1, both with
/// recording enables and both re-verifiable
pub fn scenario_table() -> &'static [CpuCapability] {
    &SCENARIO
}

/// C: a capability with an enable but no register to re-verify
pub fn boot_only_table() -> &'static [CpuCapability] {
    &BOOT_ONLY
}

/// UAO, PAN, GIC: declared in the reverse of their bit order
pub fn out_of_bit_order_table() -> &'static [CpuCapability] {
    &OUT_OF_BIT_ORDER
}

/// Simulated CPUs sharing one register file
pub struct MockPlatform {
    regs: Registers,
    cpus: usize,
    current: usize,
    has_cpu_die: bool,
    present: RefCell<Vec<bool>>,
    events: RefCell<Vec<Event>>,
    reads: Cell<usize>,
    broadcasts: Cell<usize>,
}

impl MockPlatform {
    /// `cpus` online CPUs, running on CPU 0. Clears this thread's enable
    /// log and captured log lines.
    pub fn new(cpus: usize, regs: Registers) -> Self {
        CURRENT_CPU.set(0);
        ENABLE_LOG.with_borrow_mut(|log| log.clear());
        capture_logs();
        Self {
            regs,
            cpus,
            current: 0,
            has_cpu_die: true,
            present: RefCell::new(vec![true; cpus]),
            events: RefCell::new(Vec::new()),
            reads: Cell::new(0),
            broadcasts: Cell::new(0),
        }
    }

    /// Run as CPU `cpu`
    pub fn starting(mut self, cpu: usize) -> Self {
        self.current = cpu;
        CURRENT_CPU.set(cpu);
        self
    }

    /// Simulate a platform without a way to power CPUs down
    pub fn without_cpu_die(mut self) -> Self {
        self.has_cpu_die = false;
        self
    }

    /// Run `f`, returning `true` if it ended by parking the CPU
    pub fn expect_park<F: FnOnce()>(&self, f: F) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(()) => false,
            Err(payload) if payload.is::<Parked>() => true,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn is_present(&self, cpu: usize) -> bool {
        self.present.borrow()[cpu]
    }

    pub fn register_reads(&self) -> usize {
        self.reads.get()
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcasts.get()
    }
}

impl IdRegisterReader for MockPlatform {
    fn read_id_register(&self, reg: SysReg) -> u64 {
        self.reads.set(self.reads.get() + 1);
        self.regs.read_id_register(reg)
    }
}

impl CpuOps for MockPlatform {
    fn current_cpu(&self) -> usize {
        self.current
    }

    fn on_each_cpu(&self, enable: EnableFn, cap: &'static CpuCapability) {
        self.broadcasts.set(self.broadcasts.get() + 1);
        for cpu in 0..self.cpus {
            CURRENT_CPU.set(cpu);
            enable(Some(cap));
        }
        CURRENT_CPU.set(self.current);
    }

    fn set_cpu_present(&self, cpu: usize, present: bool) {
        if !present {
            self.events.borrow_mut().push(Event::MarkedAbsent(cpu));
        }
        let mut mask = self.present.borrow_mut();
        mask[cpu] = mask[cpu] && present;
    }

    fn cpu_die(&self, cpu: usize) -> bool {
        if self.has_cpu_die {
            self.events.borrow_mut().push(Event::CpuDie(cpu));
        }
        self.has_cpu_die
    }

    fn park(&self) -> ! {
        self.events.borrow_mut().push(Event::Parked(self.current));
        panic::panic_any(Parked)
    }
}
