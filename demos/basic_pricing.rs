//! Example: Basic options pricing with Black-Scholes
//!
//! Run with: cargo run --example basic_pricing

use vanilla_greeks::prelude::*;

fn main() -> PricingResult<()> {
    // Option parameters
    let spot = 280.0;
    let strike = 280.0;
    let rate = 0.05; // 5% risk-free rate
    let div = 0.0;
    let vol = 0.30; // 30% volatility
    let time = year_fraction("20200510", "20210510")?;

    println!("=== Black-Scholes Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years ({} days)", time, day_count("20200510", "20210510")?);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let call_price = bs_price(spot, strike, rate, div, vol, time, OptionType::Call)?;
    let put_price = bs_price(spot, strike, rate, div, vol, time, OptionType::Put)?;
    println!("Call Price: ${:.4}", call_price);
    println!("Put Price:  ${:.4}", put_price);

    // Verify put-call parity: C - P = S*e^(-qT) - K*e^(-rT)
    let parity_lhs = call_price - put_price;
    let parity_rhs = spot * (-div * time).exp() - strike * (-rate * time).exp();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.4}", parity_lhs);
    println!("  S*e^(-qT) - K*e^(-rT) = {:.4}", parity_rhs);

    println!("\n=== Greeks (Put) ===\n");
    let greeks = bs_greeks(spot, strike, rate, div, vol, time, OptionType::Put)?;
    println!("Delta:  {:.4}", greeks.delta);
    println!("Gamma:  {:.6}", greeks.gamma);
    println!("Theta:  {:.4} per day", greeks.theta);
    println!("Vega:   {:.4} per vol point", greeks.vega);

    // Solve the volatility back out of the put premium
    println!("\n=== Implied Volatility ===\n");
    let contract = OptionContract::new(OptionType::Put, "20200510", "20210510", strike, spot, put_price)?.with_rate(rate);
    let engine = GreeksEngine::default();
    let priced = engine.compute_at_expiry(&contract)?;
    println!("Premium ${:.4} implies vol: {:.2}%", put_price, priced.sigma * 100.0);

    // PnL against the booked premium as expiry approaches
    println!("\n=== Term Structure (every 90 days) ===\n");
    let term = engine.compute_term_structure(&contract)?;
    for snap in term.greeks.iter().filter(|s| s.days_to_expiry % 90 == 0 || s.days_to_expiry == 1) {
        println!(
            "{:>4}d  delta {:>8.4}  theta {:>8.4}  PnL {:>9.4}",
            snap.days_to_expiry, snap.greeks.delta, snap.greeks.theta, snap.pnl
        );
    }

    Ok(())
}
