//! Interactive command loop.
//!
//! Line-oriented front-end over the core workflow. All state lives in the
//! `OrderManager`; this module only parses input, relays operations and wires
//! the notifier and journal around lifecycle transitions.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::warn;

use brigade_core::{
    format_duration, render_ticket, CustomerInfo, ItemSpec, Menu, Notifier, OrderEvent,
    OrderJournal, OrderManager, OrderState,
};

const USAGE: &str = "\
commands:
  menu                          show the catalog
  order <name> <qty> [...] [for <customer>]
                                create an order
  add <order-id> <name> <qty>   add an item to an order
  drop <order-id> <name>        remove an item from an order
  assign <order-id> <station>   queue an order at a station
  start <station>               begin preparing queued orders
  finish <station> <order-id>   mark an order ready
  deliver <order-id>            hand a ready order over
  cancel <order-id>             cancel an order
  show <order-id>               print an order ticket
  list [state]                  list orders, optionally by state
  stations                      show station load
  quit
";

pub fn run_loop(
    mut manager: OrderManager,
    menu: Menu,
    notifier: Box<dyn Notifier>,
    journal: Option<OrderJournal>,
) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("brigade kitchen console; 'help' lists commands");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            continue;
        };

        match command {
            "help" => print!("{}", USAGE),
            "menu" => show_menu(&menu),
            "order" => create_order(&mut manager, &menu, &*notifier, journal.as_ref(), args),
            "add" => add_item(&mut manager, &menu, args),
            "drop" => drop_item(&mut manager, args),
            "assign" => assign(&mut manager, &*notifier, journal.as_ref(), args),
            "start" => start(&mut manager, &*notifier, journal.as_ref(), args),
            "finish" => finish(&mut manager, &*notifier, journal.as_ref(), args),
            "deliver" => deliver(&mut manager, &*notifier, journal.as_ref(), args),
            "cancel" => cancel(&mut manager, &*notifier, journal.as_ref(), args),
            "show" => show_order(&manager, args),
            "list" => list_orders(&manager, args),
            "stations" => show_stations(&manager),
            "quit" | "exit" => break,
            other => println!("unknown command '{}'; try 'help'", other),
        }
    }
    Ok(())
}

/// Report a lifecycle event: notify (fire-and-forget) and journal the
/// snapshot. Neither failure affects the already-committed transition.
fn report(
    manager: &OrderManager,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    order_id: &str,
    event: OrderEvent,
) {
    let Some(order) = manager.get_order(order_id) else {
        return;
    };
    let record = order.to_record();
    if !notifier.notify(&record, event) {
        warn!(order_id = %order_id, event = %event, "notification not delivered");
    }
    if let Some(journal) = journal {
        if let Err(e) = journal.append(&record) {
            warn!(order_id = %order_id, "journal append failed: {}", e);
        }
    }
}

fn show_menu(menu: &Menu) {
    if menu.is_empty() {
        println!("(menu is empty)");
        return;
    }
    for item in menu.items() {
        println!(
            "  {:<20} {:>7.2}  {}",
            item.name,
            item.price,
            format_duration(item.prep_time_minutes)
        );
    }
}

/// Parse `<name> <qty> [...] [for <customer>]` into specs + customer info.
/// Names not on the menu become ad-hoc items with default prep time and
/// price.
fn parse_order_args(
    menu: &Menu,
    args: &[&str],
) -> Result<(Vec<ItemSpec>, Option<CustomerInfo>), String> {
    let (item_args, customer) = match args.iter().position(|&a| a == "for") {
        Some(pos) => {
            let name = args[pos + 1..].join(" ");
            if name.is_empty() {
                return Err("expected a customer name after 'for'".to_string());
            }
            (
                &args[..pos],
                Some(CustomerInfo {
                    name: Some(name),
                    phone: None,
                }),
            )
        }
        None => (args, None),
    };

    if item_args.is_empty() || item_args.len() % 2 != 0 {
        return Err("expected item/quantity pairs, e.g. 'order Pizza 2'".to_string());
    }

    let mut specs = Vec::new();
    for pair in item_args.chunks(2) {
        let quantity: u32 = pair[1]
            .parse()
            .map_err(|_| format!("'{}' is not a valid quantity", pair[1]))?;
        let spec = menu
            .item_spec(pair[0], quantity)
            .unwrap_or_else(|| ItemSpec::new(pair[0], quantity));
        specs.push(spec);
    }
    Ok((specs, customer))
}

fn create_order(
    manager: &mut OrderManager,
    menu: &Menu,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    args: &[&str],
) {
    let (specs, customer) = match parse_order_args(menu, args) {
        Ok(parsed) => parsed,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    match manager.create_order(specs, customer) {
        Ok(order) => {
            let eta = order
                .estimated_minutes
                .map(format_duration)
                .unwrap_or_else(|| "unknown".to_string());
            println!("created {} (estimated {})", order.id(), eta);
            report(manager, notifier, journal, order.id(), OrderEvent::Created);
        }
        Err(e) => println!("order rejected: {}", e),
    }
}

fn add_item(manager: &mut OrderManager, menu: &Menu, args: &[&str]) {
    let [order_id, name, qty] = args else {
        println!("usage: add <order-id> <name> <qty>");
        return;
    };
    let Ok(quantity) = qty.parse::<u32>() else {
        println!("'{}' is not a valid quantity", qty);
        return;
    };
    let spec = menu
        .item_spec(name, quantity)
        .unwrap_or_else(|| ItemSpec::new(*name, quantity));
    match manager.add_item(order_id, spec) {
        Ok(()) => println!("added {} x{} to {}", name, quantity, order_id),
        Err(e) => println!("cannot add item: {}", e),
    }
}

fn drop_item(manager: &mut OrderManager, args: &[&str]) {
    let [order_id, name] = args else {
        println!("usage: drop <order-id> <name>");
        return;
    };
    if manager.remove_item(order_id, name) {
        println!("removed {} from {}", name, order_id);
    } else {
        println!("no item '{}' on order {}", name, order_id);
    }
}

fn assign(
    manager: &mut OrderManager,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    args: &[&str],
) {
    let [order_id, station_id] = args else {
        println!("usage: assign <order-id> <station>");
        return;
    };
    if manager.assign_to_station(order_id, station_id) {
        println!("{} queued at {}", order_id, station_id);
        report(manager, notifier, journal, order_id, OrderEvent::Queued);
    } else {
        println!("cannot assign {} to {}", order_id, station_id);
    }
}

fn start(
    manager: &mut OrderManager,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    args: &[&str],
) {
    let [station_id] = args else {
        println!("usage: start <station>");
        return;
    };
    let moved = manager.start_preparation(station_id);
    if moved.is_empty() {
        println!("nothing to start at {}", station_id);
        return;
    }
    for order in &moved {
        println!("preparing {}", order.id());
        report(manager, notifier, journal, order.id(), OrderEvent::Preparing);
    }
}

fn finish(
    manager: &mut OrderManager,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    args: &[&str],
) {
    let [station_id, order_id] = args else {
        println!("usage: finish <station> <order-id>");
        return;
    };
    if manager.finish_order(station_id, order_id) {
        println!("{} is ready", order_id);
        report(manager, notifier, journal, order_id, OrderEvent::Ready);
    } else {
        println!("{} is not in preparation at {}", order_id, station_id);
    }
}

fn deliver(
    manager: &mut OrderManager,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    args: &[&str],
) {
    let [order_id] = args else {
        println!("usage: deliver <order-id>");
        return;
    };
    if manager.deliver_order(order_id) {
        println!("{} delivered", order_id);
        report(manager, notifier, journal, order_id, OrderEvent::Delivered);
    } else {
        println!("{} is not ready for delivery", order_id);
    }
}

fn cancel(
    manager: &mut OrderManager,
    notifier: &dyn Notifier,
    journal: Option<&OrderJournal>,
    args: &[&str],
) {
    let [order_id] = args else {
        println!("usage: cancel <order-id>");
        return;
    };
    if manager.cancel_order(order_id) {
        println!("{} cancelled", order_id);
        report(manager, notifier, journal, order_id, OrderEvent::Cancelled);
    } else {
        println!("cannot cancel {}", order_id);
    }
}

fn show_order(manager: &OrderManager, args: &[&str]) {
    let [order_id] = args else {
        println!("usage: show <order-id>");
        return;
    };
    match manager.get_order(order_id) {
        Some(order) => {
            print!("{}", render_ticket(&order.to_record(), event_for(order.state())));
            let mut history: Vec<_> = order.state_history().iter().collect();
            history.sort_by_key(|(_, at)| **at);
            for (state, at) in history {
                println!("  {:<10} {}", state, at.to_rfc3339());
            }
        }
        None => println!("no order {}", order_id),
    }
}

fn list_orders(manager: &OrderManager, args: &[&str]) {
    let filter = match args {
        [] => None,
        [state] => match state.parse::<OrderState>() {
            Ok(state) => Some(state),
            Err(e) => {
                println!("{}", e);
                return;
            }
        },
        _ => {
            println!("usage: list [state]");
            return;
        }
    };
    let orders = manager.list_orders(filter);
    if orders.is_empty() {
        println!("(no orders)");
        return;
    }
    for order in orders {
        println!(
            "  {}  {:<10} {:>7.2}  {}",
            order.id(),
            order.state(),
            order.total_price(),
            order
                .station_id
                .as_deref()
                .unwrap_or("-")
        );
    }
}

fn show_stations(manager: &OrderManager) {
    for station in manager.stations() {
        println!(
            "  {:<10} load {}/{}  queued [{}]  preparing [{}]",
            station.id(),
            station.current_load(),
            station.capacity(),
            station.queued().collect::<Vec<_>>().join(", "),
            station.in_progress().join(", ")
        );
    }
}

fn event_for(state: OrderState) -> OrderEvent {
    match state {
        OrderState::Pending => OrderEvent::Created,
        OrderState::Queued => OrderEvent::Queued,
        OrderState::Preparing => OrderEvent::Preparing,
        OrderState::Ready => OrderEvent::Ready,
        OrderState::Delivered => OrderEvent::Delivered,
        OrderState::Cancelled => OrderEvent::Cancelled,
    }
}
