use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cash::{CashLedger, CashTransactionType};
use crate::errors::{Error, Result, TransactionError};
use crate::portfolio::cgt::{cgt_method, discounted_cgt, CgtCalculator, CgtEvent};
use crate::portfolio::holding::{ApportionBasis, CostBaseReduction, Holding};
use crate::portfolio::transactions::{Transaction, TransactionDetails, TransactionKind};
use crate::temporal::HasLifetime;
use crate::utils::decimal_utils::round_cents;

/// A stateless application rule for one transaction kind.
///
/// Handlers mutate the holding and cash ledger and return the CGT events
/// they realize; events are an explicit return value, never a side channel.
pub trait TransactionHandler {
    /// Only acquisitions and opening balances may bring a holding into
    /// existence; every other kind fails against a never-opened holding.
    fn can_create_holding(&self) -> bool {
        false
    }

    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>>;
}

/// Kind-tag to handler map. Registering a new kind extends the dispatcher
/// without modifying it.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TransactionKind, Box<dyn TransactionHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry {
            handlers: HashMap::new(),
        }
    }

    /// A registry with every built-in handler installed.
    pub fn with_default_handlers() -> Self {
        let mut registry = HandlerRegistry::new();
        registry.register(TransactionKind::Acquisition, Box::new(AcquisitionHandler));
        registry.register(TransactionKind::Disposal, Box::new(DisposalHandler));
        registry.register(
            TransactionKind::IncomeReceived,
            Box::new(IncomeReceivedHandler),
        );
        registry.register(
            TransactionKind::OpeningBalance,
            Box::new(OpeningBalanceHandler),
        );
        registry.register(
            TransactionKind::ReturnOfCapital,
            Box::new(ReturnOfCapitalHandler),
        );
        registry.register(
            TransactionKind::CostBaseAdjustment,
            Box::new(CostBaseAdjustmentHandler),
        );
        registry.register(
            TransactionKind::UnitCountAdjustment,
            Box::new(UnitCountAdjustmentHandler),
        );
        registry.register(
            TransactionKind::CashTransaction,
            Box::new(CashTransactionHandler),
        );
        registry
    }

    pub fn register(&mut self, kind: TransactionKind, handler: Box<dyn TransactionHandler>) {
        self.handlers.insert(kind, handler);
    }

    pub fn get(&self, kind: TransactionKind) -> Option<&dyn TransactionHandler> {
        self.handlers.get(&kind).map(|h| h.as_ref())
    }
}

fn wrong_kind(expected: TransactionKind, transaction: &Transaction) -> Error {
    TransactionError::WrongKind {
        expected: expected.name(),
        actual: transaction.kind().name(),
    }
    .into()
}

fn instrument_id(transaction: &Transaction) -> Result<&str> {
    transaction.instrument_id.as_deref().ok_or_else(|| {
        TransactionError::InvalidTransaction(format!(
            "{} transaction {} has no instrument",
            transaction.kind(),
            transaction.id
        ))
        .into()
    })
}

fn require_holding<'a>(
    holding: Option<&'a mut Holding>,
    transaction: &Transaction,
    date: NaiveDate,
) -> Result<&'a mut Holding> {
    let holding = holding.ok_or_else(|| TransactionError::NoSharesOwned {
        instrument_id: transaction.instrument_id.clone().unwrap_or_default(),
        date,
    })?;
    if !holding.is_effective_at(date) {
        return Err(TransactionError::NoSharesOwned {
            instrument_id: holding.instrument_id().to_string(),
            date,
        }
        .into());
    }
    Ok(holding)
}

/// Builds the capital-gain event banked when a reduction outruns a parcel's
/// remaining cost base.
fn excess_gain_event(
    transaction: &Transaction,
    instrument_id: &str,
    reduction: &CostBaseReduction,
) -> CgtEvent {
    let method = cgt_method(reduction.acquisition_date, transaction.date);
    CgtEvent {
        id: Uuid::new_v4(),
        date: transaction.date,
        instrument_id: instrument_id.to_string(),
        parcel_id: reduction.parcel_id,
        units: 0,
        cost_base: Decimal::ZERO,
        amount_received: reduction.excess,
        capital_gain: reduction.excess,
        method,
        discounted_gain: discounted_cgt(reduction.excess, method),
        transaction_id: transaction.id,
    }
}

/// Opens or extends a parcel at `price x units + costs`; optionally posts
/// the full consideration as a cash withdrawal.
pub struct AcquisitionHandler;

impl TransactionHandler for AcquisitionHandler {
    fn can_create_holding(&self) -> bool {
        true
    }

    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::Acquisition {
            units,
            average_price,
            transaction_costs,
            create_cash_transaction,
        } = &transaction.details
        else {
            return Err(wrong_kind(TransactionKind::Acquisition, transaction));
        };
        let holding = holding.ok_or_else(|| {
            TransactionError::InvalidTransaction("acquisition dispatched without holding".into())
        })?;
        let instrument = instrument_id(transaction)?;

        let consideration =
            round_cents(Decimal::from(*units) * average_price + transaction_costs);
        holding.acquire(
            transaction.date,
            transaction.date,
            *units,
            consideration,
            consideration,
            transaction.id,
        )?;

        if *create_cash_transaction {
            cash.add_transaction(
                transaction.date,
                consideration,
                &format!("Purchase of {instrument}"),
                CashTransactionType::Withdrawal,
            )?;
        }
        Ok(Vec::new())
    }
}

/// Carries an externally established parcel in; the acquisition date keeps
/// its original CGT clock and no cash moves.
pub struct OpeningBalanceHandler;

impl TransactionHandler for OpeningBalanceHandler {
    fn can_create_holding(&self) -> bool {
        true
    }

    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        _cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::OpeningBalance {
            units,
            cost_base,
            acquisition_date,
        } = &transaction.details
        else {
            return Err(wrong_kind(TransactionKind::OpeningBalance, transaction));
        };
        let holding = holding.ok_or_else(|| {
            TransactionError::InvalidTransaction(
                "opening balance dispatched without holding".into(),
            )
        })?;

        holding.acquire(
            transaction.date,
            *acquisition_date,
            *units,
            *cost_base,
            *cost_base,
            transaction.id,
        )?;
        Ok(Vec::new())
    }
}

/// Consumes parcels through the CGT calculator, reduces or closes them and
/// the aggregate, posts the net proceeds, and realizes one CGT event per
/// consumed parcel.
pub struct DisposalHandler;

impl TransactionHandler for DisposalHandler {
    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::Disposal {
            units,
            average_price,
            transaction_costs,
            selection_method,
            create_cash_transaction,
        } = &transaction.details
        else {
            return Err(wrong_kind(TransactionKind::Disposal, transaction));
        };
        let holding = require_holding(holding, transaction, transaction.date)?;
        let instrument = instrument_id(transaction)?.to_string();

        let proceeds =
            round_cents(Decimal::from(*units) * average_price - transaction_costs);
        let open = holding.open_parcels(transaction.date)?;
        let sales = CgtCalculator::calculate(
            &open,
            transaction.date,
            *units,
            proceeds,
            selection_method.comparator(),
        )?;

        let mut events = Vec::with_capacity(sales.len());
        for sale in &sales {
            let view = open
                .iter()
                .find(|p| p.id == sale.parcel_id)
                .ok_or(crate::errors::LedgerError::IdNotFound(sale.parcel_id))?;

            // The purchase amount comes off proportionally by units; cost
            // base comes off exactly as apportioned by the calculator.
            let amount_change = if sale.closes_parcel {
                -view.properties.amount
            } else {
                -round_cents(
                    view.properties.amount * Decimal::from(sale.units_consumed)
                        / Decimal::from(view.properties.units),
                )
            };
            holding.change_parcel(
                sale.parcel_id,
                transaction.date,
                -sale.units_consumed,
                amount_change,
                -sale.apportioned_cost_base,
                transaction.id,
            )?;

            events.push(CgtEvent {
                id: Uuid::new_v4(),
                date: transaction.date,
                instrument_id: instrument.clone(),
                parcel_id: sale.parcel_id,
                units: sale.units_consumed,
                cost_base: sale.apportioned_cost_base,
                amount_received: sale.apportioned_amount,
                capital_gain: sale.capital_gain,
                method: sale.method,
                discounted_gain: sale.discounted_gain,
                transaction_id: transaction.id,
            });
        }

        if *create_cash_transaction {
            cash.add_transaction(
                transaction.date,
                proceeds,
                &format!("Disposal of {instrument}"),
                CashTransactionType::Deposit,
            )?;
        }
        Ok(events)
    }
}

/// Distribution handling: nets the stated DRP balance against the
/// sub-account, writes tax-deferred amounts off the cost base (banking any
/// excess as capital gains) and posts the net cash.
pub struct IncomeReceivedHandler;

impl TransactionHandler for IncomeReceivedHandler {
    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::IncomeReceived {
            franked_amount,
            unfranked_amount,
            franking_credits: _,
            interest,
            tax_deferred,
            record_date,
            drp_cash_balance,
            create_cash_transaction,
        } = &transaction.details
        else {
            return Err(wrong_kind(TransactionKind::IncomeReceived, transaction));
        };
        let holding = require_holding(holding, transaction, *record_date)?;
        let instrument = instrument_id(transaction)?.to_string();

        // Franking credits are a notional tax offset, never cash.
        let cash_income = franked_amount + unfranked_amount + interest + tax_deferred;

        let drp_delta = drp_cash_balance - holding.drp_account().balance(transaction.date);
        if !drp_delta.is_zero() {
            debug!(
                "netting DRP account of {instrument} by {drp_delta} on {}",
                transaction.date
            );
            holding.drp_account_mut().add_transaction(
                transaction.date,
                drp_delta,
                &format!("Dividend from {instrument}"),
                CashTransactionType::Deposit,
            )?;
        }

        let mut events = Vec::new();
        if *tax_deferred > Decimal::ZERO {
            let reductions = holding.reduce_cost_base(
                transaction.date,
                *tax_deferred,
                ApportionBasis::CostBase,
                transaction.id,
            )?;
            for reduction in reductions
                .iter()
                .filter(|r| r.excess > Decimal::ZERO)
            {
                events.push(excess_gain_event(transaction, &instrument, reduction));
            }
        }

        if *create_cash_transaction {
            let net = cash_income - drp_delta;
            if !net.is_zero() {
                cash.add_transaction(
                    transaction.date,
                    net,
                    &format!("Dividend from {instrument}"),
                    CashTransactionType::Deposit,
                )?;
            }
        }
        Ok(events)
    }
}

/// Non-assessable distribution: writes the amount off cost bases pro-rata by
/// units with a zero floor and posts the cash.
pub struct ReturnOfCapitalHandler;

impl TransactionHandler for ReturnOfCapitalHandler {
    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::ReturnOfCapital {
            amount,
            record_date,
            create_cash_transaction,
        } = &transaction.details
        else {
            return Err(wrong_kind(TransactionKind::ReturnOfCapital, transaction));
        };
        let holding = require_holding(holding, transaction, *record_date)?;
        let instrument = instrument_id(transaction)?.to_string();

        holding.reduce_cost_base(
            transaction.date,
            *amount,
            ApportionBasis::Units,
            transaction.id,
        )?;

        if *create_cash_transaction {
            cash.add_transaction(
                transaction.date,
                *amount,
                &format!("Return of capital from {instrument}"),
                CashTransactionType::Deposit,
            )?;
        }
        Ok(Vec::new())
    }
}

/// Reduces the holding's cost base to the given fraction of itself,
/// banking any unabsorbed amount as capital gains.
pub struct CostBaseAdjustmentHandler;

impl TransactionHandler for CostBaseAdjustmentHandler {
    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        _cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::CostBaseAdjustment { percentage } = &transaction.details else {
            return Err(wrong_kind(TransactionKind::CostBaseAdjustment, transaction));
        };
        if *percentage < Decimal::ZERO || *percentage > Decimal::ONE {
            return Err(TransactionError::InvalidTransaction(format!(
                "cost base adjustment percentage must be within [0, 1], got {percentage}"
            ))
            .into());
        }
        let holding = require_holding(holding, transaction, transaction.date)?;
        let instrument = instrument_id(transaction)?.to_string();

        let cost_base = holding.properties_at(transaction.date)?.cost_base;
        let reduction = round_cents(cost_base * (Decimal::ONE - percentage));
        if reduction.is_zero() {
            return Ok(Vec::new());
        }

        let reductions = holding.reduce_cost_base(
            transaction.date,
            reduction,
            ApportionBasis::CostBase,
            transaction.id,
        )?;
        Ok(reductions
            .iter()
            .filter(|r| r.excess > Decimal::ZERO)
            .map(|r| excess_gain_event(transaction, &instrument, r))
            .collect())
    }
}

/// Split or consolidation: rescales unit counts, cost basis unchanged.
pub struct UnitCountAdjustmentHandler;

impl TransactionHandler for UnitCountAdjustmentHandler {
    fn apply(
        &self,
        transaction: &Transaction,
        holding: Option<&mut Holding>,
        _cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::UnitCountAdjustment {
            original_units,
            new_units,
        } = &transaction.details
        else {
            return Err(wrong_kind(
                TransactionKind::UnitCountAdjustment,
                transaction,
            ));
        };
        let holding = require_holding(holding, transaction, transaction.date)?;

        holding.rescale_units(
            transaction.date,
            *original_units,
            *new_units,
            transaction.id,
        )?;
        Ok(Vec::new())
    }
}

/// A pure cash movement; needs no holding.
pub struct CashTransactionHandler;

impl TransactionHandler for CashTransactionHandler {
    fn apply(
        &self,
        transaction: &Transaction,
        _holding: Option<&mut Holding>,
        cash: &mut CashLedger,
    ) -> Result<Vec<CgtEvent>> {
        let TransactionDetails::CashTransaction {
            cash_type,
            amount,
            description,
        } = &transaction.details
        else {
            return Err(wrong_kind(TransactionKind::CashTransaction, transaction));
        };

        cash.add_transaction(
            transaction.date,
            *amount,
            description.as_deref().unwrap_or(""),
            *cash_type,
        )?;
        Ok(Vec::new())
    }
}
