//! Deployment plans.
//!
//! A plan is an ordered list of steps. Steps refer to earlier steps by
//! [`StepId`] for addresses and subscription ids that only exist once the
//! plan runs.

use std::fmt;

use ethers::abi::Token;
use ethers::types::U256;

/// Index of a step within its plan.
pub type StepId = usize;

/// A constructor or call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanArg {
    /// Known before execution.
    Token(Token),
    /// Address of the contract deployed by a step.
    Address(StepId),
    /// Subscription id created by a step.
    Subscription(StepId),
}

/// One action of a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Deploy `contract` with constructor `args`.
    Deploy {
        /// `Module#Contract`.
        key: String,
        contract: String,
        args: Vec<PlanArg>,
    },
    /// Create a VRF subscription on a deployed coordinator mock.
    CreateSubscription { key: String, coordinator: StepId },
    /// Fund a subscription.
    FundSubscription {
        coordinator: StepId,
        subscription: StepId,
        amount: U256,
    },
    /// Register a deployed contract as a subscription consumer.
    AddConsumer {
        coordinator: StepId,
        subscription: StepId,
        consumer: StepId,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Deploy { key, args, .. } => write!(f, "deploy {key} ({} args)", args.len()),
            Step::CreateSubscription { key, .. } => write!(f, "create subscription {key}"),
            Step::FundSubscription { amount, .. } => write!(f, "fund subscription with {amount}"),
            Step::AddConsumer { .. } => f.write_str("add consumer"),
        }
    }
}

/// A resolved deployment module.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPlan {
    pub module: String,
    pub steps: Vec<Step>,
}

impl DeploymentPlan {
    /// The deploy step of `contract`, if the plan has one.
    pub fn deployment(&self, contract: &str) -> Option<(StepId, &[PlanArg])> {
        self.steps.iter().enumerate().find_map(|(id, step)| match step {
            Step::Deploy {
                contract: name,
                args,
                ..
            } if name == contract => Some((id, args.as_slice())),
            _ => None,
        })
    }

    /// Contracts deployed by the plan, in order.
    pub fn contracts(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Deploy { contract, .. } => Some(contract.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Builds a [`DeploymentPlan`].
#[derive(Debug)]
pub struct ModuleBuilder {
    module: String,
    steps: Vec<Step>,
}

impl ModuleBuilder {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            steps: Vec::new(),
        }
    }

    fn push(&mut self, step: Step) -> StepId {
        self.steps.push(step);
        self.steps.len() - 1
    }

    fn key(&self, name: &str) -> String {
        format!("{}#{name}", self.module)
    }

    /// Deploy a contract.
    pub fn contract(&mut self, contract: &str, args: Vec<PlanArg>) -> StepId {
        let key = self.key(contract);
        self.push(Step::Deploy {
            key,
            contract: contract.to_string(),
            args,
        })
    }

    pub fn create_subscription(&mut self, coordinator: StepId) -> StepId {
        let key = self.key("subscriptionId");
        self.push(Step::CreateSubscription { key, coordinator })
    }

    pub fn fund_subscription(&mut self, coordinator: StepId, subscription: StepId, amount: U256) {
        self.push(Step::FundSubscription {
            coordinator,
            subscription,
            amount,
        });
    }

    pub fn add_consumer(&mut self, coordinator: StepId, subscription: StepId, consumer: StepId) {
        self.push(Step::AddConsumer {
            coordinator,
            subscription,
            consumer,
        });
    }

    pub fn build(self) -> DeploymentPlan {
        DeploymentPlan {
            module: self.module,
            steps: self.steps,
        }
    }
}
