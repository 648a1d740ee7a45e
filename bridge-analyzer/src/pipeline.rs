use crate::config::Config;
use crate::error::AnalysisError;
use crate::request::{
    AnalyseReport, Constraints, LeadReport, LeadRequest, SimulateRequest, SimulationReport,
    TRACKED_SEATS,
};
use analyzer_constraint::compile;
use analyzer_core::{Contract, Deal, Position};
use analyzer_dds::{
    aggregate, BatchSolver, BridgeSolverOracle, DoubleDummyOracle, NoValidSamplesError,
};
use analyzer_lead::{LeadOracle, LeadRanker, LeadSolverProcess};
use analyzer_pbn::{parse_deal_line, parse_hand};
use analyzer_sample::{DealerProcess, GeneratorOracle, Sampler};
use tracing::{info, warn};

/// The three request pipelines, wired to one set of oracles
pub struct Analyzer<D, G, L> {
    solver: BatchSolver<D>,
    sampler: Sampler<G>,
    leads: LeadRanker<L>,
}

/// Analyzer backed by the bundled solver and the external programs
pub type ProcessAnalyzer = Analyzer<BridgeSolverOracle, DealerProcess, LeadSolverProcess>;

impl ProcessAnalyzer {
    pub fn from_config(config: &Config) -> Self {
        let generator = DealerProcess::new(&config.dealer)
            .with_scratch_dir(&config.scratch_dir)
            .with_timeout(config.generation_timeout);
        let lead_solver = LeadSolverProcess::new(&config.leadsolver)
            .with_scratch_dir(&config.scratch_dir)
            .with_timeout(config.lead_timeout);

        Analyzer::new(
            BatchSolver::new(BridgeSolverOracle),
            Sampler::new(generator).with_max_samples(config.max_samples),
            LeadRanker::new(lead_solver),
        )
    }
}

impl<D, G, L> Analyzer<D, G, L>
where
    D: DoubleDummyOracle,
    G: GeneratorOracle,
    L: LeadOracle,
{
    pub fn new(solver: BatchSolver<D>, sampler: Sampler<G>, leads: LeadRanker<L>) -> Self {
        Analyzer {
            solver,
            sampler,
            leads,
        }
    }

    pub fn sampler(&self) -> &Sampler<G> {
        &self.sampler
    }

    /// Double-dummy table for a complete deal
    pub fn analyse(&self, deal: &str) -> Result<AnalyseReport, AnalysisError> {
        let deal = parse_deal_line(deal)?;
        if !deal.is_complete() {
            return Err(AnalysisError::InvalidRequest(
                "double-dummy analysis needs all four hands".to_string(),
            ));
        }
        let tricks = self.solver.solve_one(&deal)?;
        Ok(AnalyseReport { tricks })
    }

    /// Sample deals around the known hands and histogram the tricks North
    /// and South take in each strain.
    ///
    /// Deals the solver faults on are left out of the histograms and counted
    /// in the report.
    pub fn simulate(&self, request: &SimulateRequest) -> Result<SimulationReport, AnalysisError> {
        let fixed = parse_deal_line(&request.deal)?;
        let deals = self.sample(&fixed, &request.constraints, request.samples)?;

        let mut tables = Vec::with_capacity(deals.len());
        let mut faulted = 0;
        for (index, result) in self.solver.solve_many(&deals).into_iter().enumerate() {
            match result {
                Ok(table) => tables.push(table),
                Err(fault) => {
                    warn!(index, code = fault.code, "dropping unsolved sample");
                    faulted += 1;
                }
            }
        }

        let distribution = aggregate(&tables, &TRACKED_SEATS)?;
        info!(
            requested = request.samples,
            generated = deals.len(),
            solved = tables.len(),
            faulted,
            "simulation complete"
        );
        Ok(SimulationReport {
            requested: request.samples,
            generated: deals.len(),
            solved: tables.len(),
            faulted,
            distribution,
        })
    }

    /// Rank the leader's opening leads over deals consistent with their hand
    pub fn rank_leads(&self, request: &LeadRequest) -> Result<LeadReport, AnalysisError> {
        let hand = parse_hand(&request.hand)?;
        let contract: Contract = request.contract.parse()?;
        let leader = request.leader;

        let mut fixed = Deal::new(leader);
        fixed.set_hand(leader, Some(hand));
        let deals = self.sample(&fixed, &request.constraints, request.samples)?;

        let leads = self.leads.rank_leads(&deals, contract, leader)?;
        Ok(LeadReport::new(
            contract,
            leader,
            request.samples,
            deals.len(),
            leads,
        ))
    }

    /// Compile constraints for the unknown seats and draw deals.
    ///
    /// An empty draw is reported as `NoValidSamples`; a short one is not an
    /// error.
    fn sample(
        &self,
        fixed: &Deal,
        constraints: &Constraints,
        count: usize,
    ) -> Result<Vec<Deal>, AnalysisError> {
        if let Some(seat) = constrained_fixed_seat(fixed, constraints) {
            return Err(AnalysisError::InvalidRequest(format!(
                "{} hand is known and cannot also be constrained",
                seat.name()
            )));
        }
        let predicate = compile(constraints)?;
        let deals = self.sampler.sample(&predicate, fixed, count)?;
        if deals.is_empty() {
            return Err(NoValidSamplesError.into());
        }
        if deals.len() < count {
            warn!(
                requested = count,
                generated = deals.len(),
                "generator returned a short sample"
            );
        }
        Ok(deals)
    }
}

fn constrained_fixed_seat(fixed: &Deal, constraints: &Constraints) -> Option<Position> {
    constraints
        .keys()
        .copied()
        .find(|&seat| fixed.hand(seat).is_some())
}
