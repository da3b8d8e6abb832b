//! Plan execution.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::contract::{parse_log, ContractFactory};
use ethers::types::{Address, U256};

use dogie_contracts::bindings::vrf_coordinator_mock::SubscriptionCreatedFilter;
use dogie_contracts::bindings::VrfCoordinatorMock;
use dogie_contracts::mint::TxSettings;
use dogie_contracts::tx::send_and_confirm;
use dogie_contracts::{ArtifactStore, ContractError, SignerClient};

use crate::plan::{DeploymentPlan, PlanArg, Step, StepId};
use crate::{DeployError, Result};

/// Performs the on-chain side of plan steps.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Deploy `contract` and return its address.
    async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address>;

    /// Create a subscription on a coordinator mock and return its id.
    async fn create_subscription(&self, coordinator: Address) -> Result<U256>;

    async fn fund_subscription(
        &self,
        coordinator: Address,
        subscription: U256,
        amount: U256,
    ) -> Result<()>;

    async fn add_consumer(
        &self,
        coordinator: Address,
        subscription: U256,
        consumer: Address,
    ) -> Result<()>;
}

/// Outputs of an executed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub module: String,
    /// `Module#Contract` → address.
    pub addresses: BTreeMap<String, Address>,
    /// `Module#subscriptionId` → id.
    pub subscriptions: BTreeMap<String, U256>,
}

impl DeploymentOutcome {
    /// Address of a contract deployed by the module.
    pub fn address_of(&self, contract: &str) -> Option<Address> {
        self.addresses
            .get(&format!("{}#{contract}", self.module))
            .copied()
    }
}

#[derive(Default)]
struct Outputs {
    addresses: BTreeMap<StepId, Address>,
    subscriptions: BTreeMap<StepId, U256>,
}

impl Outputs {
    fn address(&self, step: StepId) -> Result<Address> {
        self.addresses
            .get(&step)
            .copied()
            .ok_or_else(|| DeployError::InvalidPlan(format!("step {step} deployed nothing")))
    }

    fn subscription(&self, step: StepId) -> Result<U256> {
        self.subscriptions
            .get(&step)
            .copied()
            .ok_or_else(|| DeployError::InvalidPlan(format!("step {step} created no subscription")))
    }

    fn resolve(&self, arg: &PlanArg) -> Result<Token> {
        Ok(match arg {
            PlanArg::Token(token) => token.clone(),
            PlanArg::Address(step) => Token::Address(self.address(*step)?),
            PlanArg::Subscription(step) => Token::Uint(self.subscription(*step)?),
        })
    }
}

/// Run the steps of `plan` in order.
///
/// Execution stops at the first failing step; contracts deployed by earlier
/// steps stay deployed.
pub async fn execute_plan(
    plan: &DeploymentPlan,
    deployer: &dyn ContractDeployer,
) -> Result<DeploymentOutcome> {
    let mut outputs = Outputs::default();
    let mut outcome = DeploymentOutcome {
        module: plan.module.clone(),
        ..Default::default()
    };

    for (id, step) in plan.steps.iter().enumerate() {
        tracing::info!(module = %plan.module, step = id, "{step}");
        match step {
            Step::Deploy {
                key,
                contract,
                args,
            } => {
                let tokens = args
                    .iter()
                    .map(|arg| outputs.resolve(arg))
                    .collect::<Result<Vec<_>>>()?;
                let address = deployer.deploy(contract, tokens).await?;
                tracing::info!(%key, ?address, "deployed");
                outputs.addresses.insert(id, address);
                outcome.addresses.insert(key.clone(), address);
            }
            Step::CreateSubscription { key, coordinator } => {
                let subscription = deployer
                    .create_subscription(outputs.address(*coordinator)?)
                    .await?;
                tracing::info!(%key, %subscription, "subscription created");
                outputs.subscriptions.insert(id, subscription);
                outcome.subscriptions.insert(key.clone(), subscription);
            }
            Step::FundSubscription {
                coordinator,
                subscription,
                amount,
            } => {
                deployer
                    .fund_subscription(
                        outputs.address(*coordinator)?,
                        outputs.subscription(*subscription)?,
                        *amount,
                    )
                    .await?;
            }
            Step::AddConsumer {
                coordinator,
                subscription,
                consumer,
            } => {
                deployer
                    .add_consumer(
                        outputs.address(*coordinator)?,
                        outputs.subscription(*subscription)?,
                        outputs.address(*consumer)?,
                    )
                    .await?;
            }
        }
    }
    Ok(outcome)
}

/// Deploys compiled artifacts through a signing client.
pub struct EthersDeployer {
    client: Arc<SignerClient>,
    artifacts: ArtifactStore,
    tx: TxSettings,
}

impl EthersDeployer {
    pub fn new(client: Arc<SignerClient>, artifacts: ArtifactStore, tx: TxSettings) -> Self {
        Self {
            client,
            artifacts,
            tx,
        }
    }

    fn coordinator(&self, address: Address) -> VrfCoordinatorMock<SignerClient> {
        VrfCoordinatorMock::new(address, self.client.clone())
    }
}

#[async_trait]
impl ContractDeployer for EthersDeployer {
    async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address> {
        let artifact = self.artifacts.load(contract)?;
        let factory = ContractFactory::new(artifact.abi, artifact.bytecode, self.client.clone());
        let deployment = factory
            .deploy_tokens(args)
            .map_err(|e| ContractError::call(format!("{contract} constructor"), e))?
            .confirmations(self.tx.confirmations);

        let (instance, receipt) = tokio::time::timeout(self.tx.timeout, deployment.send_with_receipt())
            .await
            .map_err(|_| ContractError::Timeout {
                what: format!("{contract} deployment"),
                secs: self.tx.timeout.as_secs(),
            })?
            .map_err(|e| ContractError::call(format!("deploy {contract}"), e))?;
        dogie_contracts::tx::ensure_success(&receipt, contract)?;
        Ok(instance.address())
    }

    async fn create_subscription(&self, coordinator: Address) -> Result<U256> {
        let mock = self.coordinator(coordinator);
        let receipt = send_and_confirm(
            &mock.create_subscription(),
            "createSubscription",
            self.tx.confirmations,
            self.tx.timeout,
        )
        .await?;
        let created = receipt
            .logs
            .iter()
            .find_map(|log| parse_log::<SubscriptionCreatedFilter>(log.clone()).ok())
            .ok_or(ContractError::MissingEvent {
                event: "SubscriptionCreated",
                tx: receipt.transaction_hash,
            })?;
        Ok(created.sub_id)
    }

    async fn fund_subscription(
        &self,
        coordinator: Address,
        subscription: U256,
        amount: U256,
    ) -> Result<()> {
        let mock = self.coordinator(coordinator);
        send_and_confirm(
            &mock.fund_subscription(subscription, amount),
            "fundSubscription",
            self.tx.confirmations,
            self.tx.timeout,
        )
        .await?;
        Ok(())
    }

    async fn add_consumer(
        &self,
        coordinator: Address,
        subscription: U256,
        consumer: Address,
    ) -> Result<()> {
        let mock = self.coordinator(coordinator);
        send_and_confirm(
            &mock.add_consumer(subscription, consumer),
            "addConsumer",
            self.tx.confirmations,
            self.tx.timeout,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::plan::ModuleBuilder;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Deploy(String, Vec<Token>),
        CreateSubscription(Address),
        Fund(Address, U256, U256),
        AddConsumer(Address, U256, Address),
    }

    /// Records calls and hands out sequential addresses.
    #[derive(Default)]
    struct RecordingDeployer {
        calls: Mutex<Vec<Call>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingDeployer {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        fn record(&self, call: Call) -> usize {
            let mut calls = match self.calls.lock() {
                Ok(calls) => calls,
                Err(poisoned) => poisoned.into_inner(),
            };
            calls.push(call);
            calls.len()
        }
    }

    #[async_trait]
    impl ContractDeployer for RecordingDeployer {
        async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address> {
            if self.fail_on == Some(contract) {
                return Err(DeployError::InvalidPlan(format!("{contract} failed")));
            }
            let n = self.record(Call::Deploy(contract.to_string(), args));
            Ok(Address::from_low_u64_be(0x100 + n as u64))
        }

        async fn create_subscription(&self, coordinator: Address) -> Result<U256> {
            self.record(Call::CreateSubscription(coordinator));
            Ok(U256::from(42))
        }

        async fn fund_subscription(
            &self,
            coordinator: Address,
            subscription: U256,
            amount: U256,
        ) -> Result<()> {
            self.record(Call::Fund(coordinator, subscription, amount));
            Ok(())
        }

        async fn add_consumer(
            &self,
            coordinator: Address,
            subscription: U256,
            consumer: Address,
        ) -> Result<()> {
            self.record(Call::AddConsumer(coordinator, subscription, consumer));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_outputs_flow_into_later_steps() {
        let mut m = ModuleBuilder::new("M");
        let mock = m.contract("Mock", vec![PlanArg::Token(Token::Uint(U256::from(1)))]);
        let sub = m.create_subscription(mock);
        m.fund_subscription(mock, sub, U256::from(10));
        let nft = m.contract(
            "Nft",
            vec![PlanArg::Address(mock), PlanArg::Subscription(sub)],
        );
        m.add_consumer(mock, sub, nft);
        let plan = m.build();

        let deployer = RecordingDeployer::default();
        let outcome = execute_plan(&plan, &deployer).await.expect("execute");

        let mock_address = Address::from_low_u64_be(0x101);
        let nft_address = Address::from_low_u64_be(0x104);
        assert_eq!(
            deployer.calls(),
            vec![
                Call::Deploy("Mock".to_string(), vec![Token::Uint(U256::from(1))]),
                Call::CreateSubscription(mock_address),
                Call::Fund(mock_address, U256::from(42), U256::from(10)),
                Call::Deploy(
                    "Nft".to_string(),
                    vec![Token::Address(mock_address), Token::Uint(U256::from(42))]
                ),
                Call::AddConsumer(mock_address, U256::from(42), nft_address),
            ]
        );
        assert_eq!(outcome.address_of("Mock"), Some(mock_address));
        assert_eq!(outcome.address_of("Nft"), Some(nft_address));
        assert_eq!(outcome.subscriptions.get("M#subscriptionId"), Some(&U256::from(42)));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let mut m = ModuleBuilder::new("M");
        m.contract("A", vec![]);
        m.contract("B", vec![]);
        m.contract("C", vec![]);
        let plan = m.build();

        let deployer = RecordingDeployer {
            fail_on: Some("B"),
            ..Default::default()
        };
        assert!(execute_plan(&plan, &deployer).await.is_err());
        assert_eq!(deployer.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_forward_reference_rejected() {
        let plan = DeploymentPlan {
            module: "M".to_string(),
            steps: vec![Step::Deploy {
                key: "M#A".to_string(),
                contract: "A".to_string(),
                args: vec![PlanArg::Address(3)],
            }],
        };
        let err = execute_plan(&plan, &RecordingDeployer::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidPlan(_)));
    }
}
