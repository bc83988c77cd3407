//! Authored PVARA sector schemas.
//!
//! One schema per licensable virtual-asset activity under the Pakistan VASP
//! regulations. Titles, options and help text are what the admin forms show.

use vasp_core::{FieldKey, SectorId};

use crate::schema::{FieldDescriptor, FieldKind, SectorIcon, SectorSchema};

fn sector(id: &str, title: &str, icon: SectorIcon, fields: Vec<FieldDescriptor>) -> SectorSchema {
    SectorSchema {
        sector_id: SectorId::new(id).expect("built-in sector ids are slugs"),
        title: title.to_string(),
        icon,
        fields,
    }
}

fn key(k: &str) -> FieldKey {
    FieldKey::new(k).expect("built-in field keys are snake_case")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn text(k: &str, label: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::new(key(k), label, FieldKind::Text { placeholder: None })
        .with_description(description)
}

fn number(k: &str, label: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        key(k),
        label,
        FieldKind::Number {
            step: None,
            min: Some(0.0),
        },
    )
    .with_description(description)
}

fn percentage(k: &str, label: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        key(k),
        label,
        FieldKind::Number {
            step: Some(0.01),
            min: Some(0.0),
        },
    )
    .with_description(description)
}

fn select(k: &str, label: &str, options: &[&str], description: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        key(k),
        label,
        FieldKind::Select {
            options: strings(options),
        },
    )
    .with_description(description)
}

fn multi_select(k: &str, label: &str, options: &[&str], description: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        key(k),
        label,
        FieldKind::MultiSelect {
            options: strings(options),
        },
    )
    .with_description(description)
}

fn multi_input(k: &str, label: &str, placeholder: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        key(k),
        label,
        FieldKind::MultiInput {
            placeholder: Some(placeholder.to_string()),
        },
    )
    .with_description(description)
}

fn boolean(k: &str, label: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::new(key(k), label, FieldKind::Boolean).with_description(description)
}

fn textarea(k: &str, label: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        key(k),
        label,
        FieldKind::TextArea {
            placeholder: None,
            rows: 3,
        },
    )
    .with_description(description)
}

/// The ten authored sector schemas, in display order.
pub(crate) fn schemas() -> Vec<SectorSchema> {
    vec![
        sector(
            "advisory-services",
            "Advisory Services Details",
            SectorIcon::Briefcase,
            vec![
                multi_select(
                    "advisory_focus_areas",
                    "Advisory Focus Areas",
                    &[
                        "Consulting on Virtual Assets",
                        "Risk Management",
                        "Compliance Advice",
                        "PVARA License Assistance",
                        "Blockchain Implementation",
                        "Regulatory Strategy",
                        "Due Diligence",
                        "Market Analysis",
                    ],
                    "Select all areas of advisory expertise",
                ),
                select(
                    "client_type",
                    "Primary Client Type",
                    &["Retail", "Institutional", "VASPs", "Mixed"],
                    "Main type of clients served",
                ),
                number(
                    "advisory_reports_last_year",
                    "Advisory Reports/Memoranda (Last Year)",
                    "Number of advisory reports or memoranda distributed in the last year",
                ),
            ],
        ),
        sector(
            "broker-dealer-services",
            "Broker-Dealer Services Details",
            SectorIcon::TrendingUp,
            vec![
                multi_select(
                    "trading_platforms_supported",
                    "Trading Platforms Supported",
                    &[
                        "Spot Trading",
                        "Margin Trading",
                        "Futures Trading",
                        "Options Trading",
                        "Web Platform",
                        "Mobile App",
                        "API Trading",
                        "Algorithmic Trading",
                    ],
                    "Select all supported trading platforms and methods",
                ),
                multi_select(
                    "asset_types_handled",
                    "Asset Types Handled",
                    &[
                        "Bitcoin (BTC)",
                        "Ethereum (ETH)",
                        "Major Altcoins",
                        "Stablecoins",
                        "DeFi Tokens",
                        "NFTs",
                        "Tokenized Securities",
                        "Derivatives",
                    ],
                    "Types of digital assets handled",
                ),
                number(
                    "annual_transaction_volume_pkr",
                    "Annual Transaction Volume (PKR)",
                    "Total annual transaction volume in Pakistani Rupees",
                ),
            ],
        ),
        sector(
            "custody-services",
            "Custody Services Details",
            SectorIcon::Shield,
            vec![
                multi_select(
                    "custody_type",
                    "Custody Types Offered",
                    &[
                        "Hot Wallet Storage",
                        "Cold Storage",
                        "Multi-Signature Wallets",
                        "Hardware Security Modules",
                        "Institutional Custody",
                        "Self-Custody Solutions",
                        "Hybrid Solutions",
                    ],
                    "Types of custody solutions provided",
                ),
                boolean(
                    "insurance_coverage",
                    "Insurance Coverage",
                    "Does the service include insurance coverage for custodied assets?",
                ),
                number(
                    "insurance_amount_pkr",
                    "Insurance Coverage Amount (PKR)",
                    "Total insurance coverage amount in Pakistani Rupees",
                )
                .conditional_on(key("insurance_coverage")),
                select(
                    "audit_frequency",
                    "Audit Frequency for Custodied Assets",
                    &[
                        "Monthly",
                        "Quarterly",
                        "Semi-Annually",
                        "Annually",
                        "Continuous",
                        "On-Demand",
                    ],
                    "How frequently are custodied assets audited?",
                ),
            ],
        ),
        sector(
            "exchange-services",
            "Exchange Services Details",
            SectorIcon::Globe,
            vec![
                select(
                    "exchange_type",
                    "Exchange Type",
                    &["Centralized", "Decentralized", "Hybrid"],
                    "Primary type of exchange operation",
                ),
                multi_input(
                    "supported_trading_pairs",
                    "Supported Trading Pairs",
                    "e.g., BTC/PKR, ETH/USDT",
                    "List all supported trading pairs",
                ),
                number(
                    "daily_trading_volume_pkr",
                    "Daily Trading Volume (PKR)",
                    "Average daily trading volume in Pakistani Rupees",
                ),
                multi_select(
                    "order_types_supported",
                    "Order Types Supported",
                    &[
                        "Market Orders",
                        "Limit Orders",
                        "Stop-Loss Orders",
                        "Take-Profit Orders",
                        "Trailing Stop",
                        "Fill or Kill",
                        "Immediate or Cancel",
                    ],
                    "Types of trading orders supported",
                ),
            ],
        ),
        sector(
            "lending-borrowing",
            "Lending and Borrowing Services Details",
            SectorIcon::DollarSign,
            vec![
                multi_select(
                    "lending_type",
                    "Lending Types Offered",
                    &[
                        "DeFi Lending",
                        "CeFi Lending",
                        "Yield Generation",
                        "Liquidity Mining",
                        "Staking Services",
                        "Peer-to-Peer Lending",
                        "Institutional Lending",
                    ],
                    "Types of lending and borrowing services",
                ),
                percentage(
                    "average_interest_rate",
                    "Average Interest/Yield Rate (%)",
                    "Average annual interest or yield rate offered",
                ),
                select(
                    "collateral_requirements",
                    "Collateral Requirements",
                    &[
                        "Over-Collateralized (>100%)",
                        "Fully Collateralized (100%)",
                        "Under-Collateralized (<100%)",
                        "Uncollateralized",
                        "Variable Based on Risk",
                    ],
                    "Typical collateral requirements for lending",
                ),
            ],
        ),
        sector(
            "derivatives",
            "Virtual Asset Derivatives Details",
            SectorIcon::TrendingUp,
            vec![
                multi_select(
                    "derivatives_types",
                    "Derivatives Types Offered",
                    &[
                        "Futures Contracts",
                        "Options Contracts",
                        "Perpetual Swaps",
                        "Interest Rate Swaps",
                        "Currency Swaps",
                        "Credit Default Swaps",
                        "Synthetic Assets",
                    ],
                    "Types of derivative instruments offered",
                ),
                multi_select(
                    "leverage_levels",
                    "Leverage Levels Supported",
                    &["2x", "5x", "10x", "20x", "50x", "100x", "Custom"],
                    "Available leverage multipliers",
                ),
                select(
                    "settlement_mechanism",
                    "Settlement Mechanism",
                    &[
                        "Cash-Settled",
                        "Physically Delivered",
                        "Net Settlement",
                        "Gross Settlement",
                        "T+0 Settlement",
                        "T+1 Settlement",
                    ],
                    "How derivatives contracts are settled",
                ),
            ],
        ),
        sector(
            "asset-management",
            "Asset Management and Investment Details",
            SectorIcon::Briefcase,
            vec![
                multi_select(
                    "investment_products",
                    "Investment Products Offered",
                    &[
                        "Crypto Index Funds",
                        "ETFs",
                        "Managed Portfolios",
                        "Hedge Funds",
                        "Pension Funds",
                        "Mutual Funds",
                        "Private Equity",
                        "Venture Capital",
                    ],
                    "Types of investment products and services",
                ),
                number(
                    "aum_pkr",
                    "Assets Under Management (PKR)",
                    "Total assets under management in Pakistani Rupees",
                ),
                percentage(
                    "annual_returns_percentage",
                    "Average Annual Returns (%)",
                    "Historical average annual returns percentage",
                ),
                select(
                    "investment_strategy",
                    "Investment Strategy",
                    &[
                        "Active Management",
                        "Passive Management",
                        "Quantitative",
                        "Value Investing",
                        "Growth Investing",
                        "Index Tracking",
                        "Alternative Strategies",
                    ],
                    "Primary investment strategy approach",
                ),
            ],
        ),
        sector(
            "transfer-settlement",
            "Transfer and Settlement Services Details",
            SectorIcon::Clock,
            vec![
                multi_select(
                    "transfer_types",
                    "Transfer Types Supported",
                    &[
                        "P2P Transfers",
                        "Bill Payments",
                        "Merchant Payments",
                        "Remittances",
                        "Cross-border Transfers",
                        "Bulk Transfers",
                        "Scheduled Transfers",
                    ],
                    "Types of transfer services offered",
                ),
                select(
                    "settlement_speed",
                    "Settlement Speed",
                    &[
                        "Instant",
                        "Near-Instant (<1 min)",
                        "T+0 (Same Day)",
                        "T+1",
                        "T+2",
                        "T+3",
                        "Variable",
                    ],
                    "Typical settlement timeframe",
                ),
                multi_select(
                    "supported_networks",
                    "Supported Networks/Protocols",
                    &[
                        "Bitcoin Network",
                        "Ethereum",
                        "Binance Smart Chain",
                        "Polygon",
                        "Solana",
                        "Cardano",
                        "Lightning Network",
                        "Traditional Banking",
                        "SWIFT",
                        "1Link (Pakistan)",
                    ],
                    "Blockchain networks and payment systems supported",
                ),
            ],
        ),
        sector(
            "fiat-tokens",
            "Fiat Referenced Token Issuance Details",
            SectorIcon::Coins,
            vec![
                multi_select(
                    "fiat_backing",
                    "Fiat Currency Backing",
                    &[
                        "PKR",
                        "USD",
                        "EUR",
                        "GBP",
                        "JPY",
                        "AED",
                        "SAR",
                        "Multi-Currency Basket",
                    ],
                    "Fiat currencies backing the issued tokens",
                ),
                select(
                    "peg_mechanism",
                    "Peg Mechanism",
                    &[
                        "1:1 Reserve Backing",
                        "Algorithmic Stabilization",
                        "Hybrid (Reserve + Algorithm)",
                        "Overcollateralized",
                        "Fractional Reserve",
                    ],
                    "Method used to maintain price stability",
                ),
                textarea(
                    "redemption_policy",
                    "Redemption Policy",
                    "Policy and process for token redemption to fiat currency",
                ),
                select(
                    "reserve_audit_frequency",
                    "Reserve Audit Frequency",
                    &["Real-time", "Daily", "Weekly", "Monthly", "Quarterly", "Annually"],
                    "How frequently are reserves audited?",
                ),
            ],
        ),
        sector(
            "asset-tokens",
            "Asset Referenced Token Issuance Details",
            SectorIcon::Building,
            vec![
                multi_select(
                    "backing_assets",
                    "Backing Assets",
                    &[
                        "Real Estate",
                        "Commodities (Gold, Silver, Oil)",
                        "Stocks/Equities",
                        "Bonds",
                        "Art and Collectibles",
                        "Intellectual Property",
                        "Carbon Credits",
                        "Mixed Asset Baskets",
                    ],
                    "Types of real-world assets backing the tokens",
                ),
                select(
                    "reserve_audit_frequency",
                    "Reserve/Asset Audit Frequency",
                    &[
                        "Monthly",
                        "Quarterly",
                        "Semi-Annually",
                        "Annually",
                        "On-Demand",
                        "Continuous Monitoring",
                    ],
                    "How frequently are backing assets audited?",
                ),
                text(
                    "total_token_supply",
                    "Total Token Supply",
                    "Total number of tokens issued (e.g., 1,000,000 tokens)",
                ),
                select(
                    "asset_valuation_method",
                    "Asset Valuation Method",
                    &[
                        "Market Price",
                        "Independent Appraisal",
                        "Book Value",
                        "Fair Market Value",
                        "Discounted Cash Flow",
                        "Hybrid Approach",
                    ],
                    "Method used to value backing assets",
                ),
            ],
        ),
    ]
}
