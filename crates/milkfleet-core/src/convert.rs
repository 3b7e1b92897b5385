// ── Wire DTO → domain conversions ──
//
// Lenient where the backend is sloppy: unknown status strings become
// Offline, missing payment methods become Unknown. A malformed optional
// field never fails a whole snapshot.

use milkfleet_api::types::{
    AccountDto, CashPaymentDto, DeviceDto, PricingDto, TransactionDto, VendorDto, WithdrawalDto,
};

use crate::model::{
    Account, CashPayment, Device, DeviceStatus, PaymentMethod, Pricing, Transaction, Vendor,
    Withdrawal,
};

impl From<VendorDto> for Vendor {
    fn from(dto: VendorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            shop_name: dto.shop_name,
        }
    }
}

impl From<DeviceDto> for Device {
    fn from(dto: DeviceDto) -> Self {
        let status = if dto.status.eq_ignore_ascii_case("online") {
            DeviceStatus::Online
        } else {
            DeviceStatus::Offline
        };
        Self {
            id: dto.id,
            name: dto.name,
            status,
            is_tampered: dto.is_tampered,
            last_updated: dto.last_updated,
            capacity: dto.capacity,
            temperature: dto.temperature,
        }
    }
}

impl From<TransactionDto> for Transaction {
    fn from(dto: TransactionDto) -> Self {
        Self {
            id: dto.id,
            device_id: dto.device_id,
            device_name: dto.device_name,
            amount: dto.amount,
            currency: dto.currency,
            timestamp: dto.timestamp,
            method: dto
                .method
                .as_deref()
                .map_or(PaymentMethod::Unknown, PaymentMethod::parse),
        }
    }
}

impl From<PricingDto> for Pricing {
    fn from(dto: PricingDto) -> Self {
        Self {
            price_per_litre: dto.price_per_litre,
        }
    }
}

impl From<WithdrawalDto> for Withdrawal {
    fn from(dto: WithdrawalDto) -> Self {
        Self {
            id: dto.id,
            amount: dto.amount,
            timestamp: dto.timestamp,
        }
    }
}

impl From<AccountDto> for Account {
    fn from(dto: AccountDto) -> Self {
        Self {
            balance: dto.balance,
            withdrawals: dto.withdrawals.into_iter().map(Withdrawal::from).collect(),
        }
    }
}

impl From<CashPaymentDto> for CashPayment {
    fn from(dto: CashPaymentDto) -> Self {
        Self {
            id: dto.id,
            device_id: dto.device_id,
            amount: dto.amount,
            timestamp: dto.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milkfleet_api::types::DeviceDto;

    #[test]
    fn unknown_status_string_maps_to_offline() {
        let dto = DeviceDto {
            id: "D9".into(),
            name: "Depot".into(),
            status: "rebooting".into(),
            is_tampered: false,
            last_updated: None,
            capacity: None,
            temperature: None,
        };
        let device = Device::from(dto);
        assert_eq!(device.status, DeviceStatus::Offline);
    }

    #[test]
    fn payment_method_parse_is_lenient() {
        assert_eq!(PaymentMethod::parse("CASH"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse("mpesa"), PaymentMethod::Mobile);
        assert_eq!(PaymentMethod::parse("crypto"), PaymentMethod::Unknown);
    }
}
