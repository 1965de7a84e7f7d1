/// CPU configuration options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSettings {
    /// Family member being emulated. All of them share the same core, only
    /// the identification strings change
    pub variant: Variant,

    /// How reads of the quasi-bidirectional ports P1 and P2 are resolved
    pub port_handling: PortHandling,

    /// Fast forward the remaining cycle budget when the program parks itself
    /// in a `JMP $` loop (or a `NOP; JMP $-1` pair). Idle time is skipped,
    /// architectural state is unaffected
    pub busy_loop_skip: bool,

    /// Copy the saved program bank (`A11ff`) back into `A11` on `RETR`.
    /// Disabled by default, so that banked ROMs keep the behavior they were
    /// dumped and tuned against
    pub restore_bank_on_retr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    I8035,
    I8039,
    I8048,
    N7751,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::I8035 => "I8035",
            Variant::I8039 => "I8039",
            Variant::I8048 => "I8048",
            Variant::N7751 => "N7751",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortHandling {
    /// Every port read goes straight to the bus
    Direct,
    /// P1 and P2 reads return the bus input ANDed with the last value the
    /// program wrote to the port
    Latched,
}

impl Default for CpuSettings {
    fn default() -> Self {
        Self {
            variant: Variant::I8039,
            port_handling: PortHandling::Direct,
            busy_loop_skip: true,
            restore_bank_on_retr: false,
        }
    }
}
