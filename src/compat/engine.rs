//! Rule evaluation engine for build compatibility.
//!
//! The `CompatibilityEngine` takes one candidate component and the current
//! build, then reports every constraint the candidate breaks against the
//! parts already chosen. Evaluation is pure: same inputs, same ordered
//! output, no mutation.

use tracing::debug;

use crate::build::Configuration;
use crate::catalog::{
    CaseSpecs, Component, CoolerSpecs, CpuSpecs, GpuSpecs, MotherboardSpecs, PsuSpecs, RamSpecs,
    Specs,
};

use super::rules::default_rules;
use super::types::*;

/// The compatibility rule engine.
///
/// Holds only the rule constants; the build is passed into every call.
#[derive(Debug, Clone)]
pub struct CompatibilityEngine {
    rules: CompatRules,
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl CompatibilityEngine {
    /// Create a new engine with the given rule constants.
    ///
    /// # Arguments
    /// * `rules` - Rule configuration (typically from `default_rules()` or `load_rules()`)
    pub fn new(rules: CompatRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CompatRules {
        &self.rules
    }

    /// Check a candidate against a build.
    ///
    /// Rules are selected by the candidate's category and run in a fixed
    /// order. A rule only fires when both sides declare the attribute it
    /// compares. The candidate's own slot in `build` is never consulted.
    pub fn check(&self, candidate: &Component, build: &Configuration) -> Vec<Violation> {
        let mut violations = Vec::new();

        match &candidate.specs {
            Specs::Cpu(specs) => self.check_cpu(specs, build, &mut violations),
            Specs::Motherboard(specs) => self.check_motherboard(specs, build, &mut violations),
            Specs::Ram(specs) => self.check_ram(specs, build, &mut violations),
            Specs::Gpu(specs) => self.check_gpu(specs, build, &mut violations),
            Specs::Psu(specs) => self.check_psu(specs, build, &mut violations),
            Specs::Case(specs) => self.check_case(specs, build, &mut violations),
            Specs::Cooler(specs) => self.check_cooler(specs, build, &mut violations),
            Specs::Storage(_) | Specs::Unclassified { .. } => {}
        }

        violations
    }

    /// Violation messages for a candidate, in rule order.
    pub fn evaluate(&self, candidate: &Component, build: &Configuration) -> Vec<String> {
        self.check(candidate, build)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    /// Total price plus per-slot violations for a whole build.
    ///
    /// Each occupant is evaluated against the build with its own slot
    /// removed.
    pub fn summarize(&self, build: &Configuration) -> BuildSummary {
        let mut violations = ViolationSet::new();

        for (category, occupant) in build.iter() {
            let issues = self.evaluate(occupant, &build.without(category));
            if !issues.is_empty() {
                violations.insert(category, issues);
            }
        }

        let summary = BuildSummary {
            total_price: build.total_price(),
            violations,
        };

        debug!(
            "Summarized build: {} slots, total {}, {} conflicting",
            build.len(),
            summary.total_price,
            summary.violations.len()
        );

        summary
    }

    fn check_cpu(&self, cpu: &CpuSpecs, build: &Configuration, out: &mut Vec<Violation>) {
        if let Some((board, board_specs)) = build.motherboard() {
            if let (Some(socket), Some(board_socket)) = (&cpu.socket, &board_specs.socket) {
                if socket != board_socket {
                    out.push(Violation::new(
                        ViolationKind::Socket,
                        format!("Incompatible socket with {}", board.name),
                    ));
                }
            }
        }

        if let (Some(socket), Some((ram, ram_specs))) = (&cpu.socket, build.ram()) {
            if let Some(ram_standard) = ram_specs.ram_type {
                match self.memory_requirement(socket) {
                    Some(MemoryRequirement::FollowsMotherboard { .. }) => {
                        if let Some((board, board_specs)) = build.motherboard() {
                            if let Some(required) = board_specs.memory_type {
                                if ram_standard != required {
                                    out.push(Violation::new(
                                        ViolationKind::MemoryStandard,
                                        format!("Requires {} RAM for {}", required, board.name),
                                    ));
                                }
                            }
                        }
                    }
                    Some(MemoryRequirement::Fixed { standard, .. }) => {
                        if ram_standard != *standard {
                            out.push(Violation::new(
                                ViolationKind::MemoryStandard,
                                format!(
                                    "This CPU requires {} RAM ({} is {})",
                                    standard, ram.name, ram_standard
                                ),
                            ));
                        }
                    }
                    None => {}
                }
            }
        }

        let gpu_draw = build.gpu().and_then(|(_, gpu)| gpu.power_draw);
        self.check_supply(&[cpu.power_draw, gpu_draw], build, out);
    }

    fn check_motherboard(
        &self,
        board: &MotherboardSpecs,
        build: &Configuration,
        out: &mut Vec<Violation>,
    ) {
        if let Some((cpu, cpu_specs)) = build.cpu() {
            if let (Some(socket), Some(cpu_socket)) = (&board.socket, &cpu_specs.socket) {
                if socket != cpu_socket {
                    out.push(Violation::new(
                        ViolationKind::Socket,
                        format!("Incompatible socket with {}", cpu.name),
                    ));
                }
            }
        }

        if let Some((ram, ram_specs)) = build.ram() {
            if let (Some(standard), Some(ram_standard)) = (board.memory_type, ram_specs.ram_type) {
                if standard != ram_standard {
                    out.push(Violation::new(
                        ViolationKind::MemoryStandard,
                        format!("Incompatible RAM type with {}", ram.name),
                    ));
                }
            }
        }

        if let Some((case, case_specs)) = build.case() {
            if let (Some(form_factor), Some(supported)) =
                (board.form_factor, &case_specs.supported_form_factors)
            {
                if !supported.contains(&form_factor) {
                    out.push(Violation::new(
                        ViolationKind::FormFactor,
                        format!("{} form factor not supported by {}", form_factor, case.name),
                    ));
                }
            }
        }
    }

    fn check_ram(&self, ram: &RamSpecs, build: &Configuration, out: &mut Vec<Violation>) {
        let Some(standard) = ram.ram_type else {
            return;
        };

        if let Some((board, board_specs)) = build.motherboard() {
            if let Some(board_standard) = board_specs.memory_type {
                if standard != board_standard {
                    out.push(Violation::new(
                        ViolationKind::MemoryStandard,
                        format!("Incompatible RAM type for {}", board.name),
                    ));
                }
            }
        }

        // Only fixed families apply here; the motherboard-following family
        // is the check above.
        if let Some((cpu, cpu_specs)) = build.cpu() {
            if let Some(socket) = &cpu_specs.socket {
                if let Some(MemoryRequirement::Fixed { standard: required, .. }) =
                    self.memory_requirement(socket)
                {
                    if standard != *required {
                        out.push(Violation::new(
                            ViolationKind::MemoryStandard,
                            format!(
                                "Incompatible with {} CPU {} (requires {})",
                                socket, cpu.name, required
                            ),
                        ));
                    }
                }
            }
        }
    }

    fn check_gpu(&self, gpu: &GpuSpecs, build: &Configuration, out: &mut Vec<Violation>) {
        if let Some((case, case_specs)) = build.case() {
            if let (Some(length), Some(max)) = (gpu.length, case_specs.max_gpu_length) {
                if length > max {
                    out.push(Violation::new(
                        ViolationKind::GpuClearance,
                        format!("Too long for {} (max {}mm)", case.name, max),
                    ));
                }
            }
        }

        let cpu_draw = build.cpu().and_then(|(_, cpu)| cpu.power_draw);
        self.check_supply(&[gpu.power_draw, cpu_draw], build, out);
    }

    fn check_psu(&self, psu: &PsuSpecs, build: &Configuration, out: &mut Vec<Violation>) {
        let Some(wattage) = psu.wattage else {
            return;
        };
        let cpu_draw = build.cpu().and_then(|(_, cpu)| cpu.power_draw);
        let gpu_draw = build.gpu().and_then(|(_, gpu)| gpu.power_draw);

        if let Some(estimate) = self.estimated_draw(&[cpu_draw, gpu_draw]) {
            if u64::from(wattage) < estimate {
                out.push(Violation::new(
                    ViolationKind::PowerBudget,
                    format!(
                        "May be insufficient wattage for current build ({}W available, {}W estimated)",
                        wattage, estimate
                    ),
                ));
            }
        }
    }

    fn check_case(&self, case: &CaseSpecs, build: &Configuration, out: &mut Vec<Violation>) {
        if let Some((board, board_specs)) = build.motherboard() {
            if let (Some(supported), Some(form_factor)) =
                (&case.supported_form_factors, board_specs.form_factor)
            {
                if !supported.contains(&form_factor) {
                    out.push(Violation::new(
                        ViolationKind::FormFactor,
                        format!("Does not support {} motherboard {}", form_factor, board.name),
                    ));
                }
            }
        }

        if let Some((gpu, gpu_specs)) = build.gpu() {
            if let (Some(max), Some(length)) = (case.max_gpu_length, gpu_specs.length) {
                if length > max {
                    out.push(Violation::new(
                        ViolationKind::GpuClearance,
                        format!("GPU {} is too long (max {}mm)", gpu.name, max),
                    ));
                }
            }
        }

        if let Some((cooler, cooler_specs)) = build.cooler() {
            if let (Some(max), Some(height)) = (case.max_cooler_height, cooler_specs.height) {
                if height > max {
                    out.push(Violation::new(
                        ViolationKind::CoolerClearance,
                        format!("CPU Cooler {} is too tall (max {}mm)", cooler.name, max),
                    ));
                }
            }
        }
    }

    fn check_cooler(&self, cooler: &CoolerSpecs, build: &Configuration, out: &mut Vec<Violation>) {
        if let Some((case, case_specs)) = build.case() {
            if let (Some(height), Some(max)) = (cooler.height, case_specs.max_cooler_height) {
                if height > max {
                    out.push(Violation::new(
                        ViolationKind::CoolerClearance,
                        format!("Too tall for {} (max {}mm)", case.name, max),
                    ));
                }
            }
        }
    }

    /// Compare an estimated draw against the installed power supply.
    fn check_supply(&self, draws: &[Option<u32>], build: &Configuration, out: &mut Vec<Violation>) {
        let Some((psu, psu_specs)) = build.psu() else {
            return;
        };
        let Some(wattage) = psu_specs.wattage else {
            return;
        };

        if let Some(estimate) = self.estimated_draw(draws) {
            if u64::from(wattage) < estimate {
                out.push(Violation::new(
                    ViolationKind::PowerBudget,
                    format!("PSU {} may be insufficient ({}W)", psu.name, wattage),
                ));
            }
        }
    }

    /// Declared draws plus the baseline. `None` when no part declares a
    /// draw, since there is nothing to budget. Summed in `u64` so no
    /// declared value can overflow.
    fn estimated_draw(&self, draws: &[Option<u32>]) -> Option<u64> {
        if draws.iter().all(Option::is_none) {
            return None;
        }
        let declared: u64 = draws.iter().flatten().map(|&w| u64::from(w)).sum();
        Some(declared + u64::from(self.rules.baseline_power_watts))
    }

    fn memory_requirement(&self, socket: &str) -> Option<&MemoryRequirement> {
        self.rules
            .memory_requirements
            .iter()
            .find(|r| r.applies_to(socket))
    }
}
