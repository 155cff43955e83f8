use anyhow::bail;
use clap::Parser;
use coupon_pool::MAX_CODE_LENGTH;

/// Runtime configuration for the `coupon-pool-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults suitable for a single-node
/// deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "coupon-pool-server",
    version,
    about = "A JSON service for issuing single-use coupons from fixed-size campaigns"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Example: "0.0.0.0:8080" or "127.0.0.1:3000"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Upper bound on `maxCoupon` accepted by `CreateCampaign`.
    ///
    /// Every coupon of a campaign is generated up front and kept in memory
    /// for the lifetime of the process, so this caps both the memory and the
    /// time a single creation request may consume.
    ///
    /// Environment variable: `MAX_COUPONS_PER_CAMPAIGN`
    #[arg(long, env = "MAX_COUPONS_PER_CAMPAIGN", default_value_t = 100_000)]
    pub max_coupons_per_campaign: usize,

    /// Number of symbols in every generated coupon code (1 to 10).
    ///
    /// Codes of six symbols or more carry a 3-digit time prefix.
    ///
    /// Environment variable: `CODE_LENGTH`
    #[arg(long, env = "CODE_LENGTH", default_value_t = MAX_CODE_LENGTH)]
    pub code_length: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub max_coupons_per_campaign: usize,
    pub code_length: usize,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_coupons_per_campaign == 0 {
            bail!("MAX_COUPONS_PER_CAMPAIGN must be greater than 0");
        }

        if args.code_length == 0 || args.code_length > MAX_CODE_LENGTH {
            bail!(
                "CODE_LENGTH ({}) must be between 1 and {}",
                args.code_length,
                MAX_CODE_LENGTH
            );
        }

        Ok(Self {
            server_addr: args.server_addr,
            max_coupons_per_campaign: args.max_coupons_per_campaign,
            code_length: args.code_length,
        })
    }
}
